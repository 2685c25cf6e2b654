use notebook_core::{Effect, EntryId, EvalOutcome};
use notebook_engine::{EngineEvent, EvalError, EvalHandle, EvalReply, EvalSettings, FailureKind};
use notebook_logging::{notebook_debug, notebook_info, notebook_warn};

/// Forwards network effects to the evaluation engine and collects its
/// completions for the UI thread.
pub struct EffectRunner {
    engine: EvalHandle,
}

impl EffectRunner {
    pub fn new(settings: EvalSettings) -> Result<Self, EvalError> {
        notebook_info!(
            "Evaluation endpoint {} timeout={:?}",
            settings.endpoint,
            settings.request_timeout
        );
        Ok(Self {
            engine: EvalHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PostEval { entry_id, source } => {
                    notebook_info!("PostEval entry_id={} source_len={}", entry_id, source.len());
                    self.engine.submit(entry_id, source);
                }
                Effect::CancelEval { entry_id } => {
                    notebook_info!("CancelEval entry_id={}", entry_id);
                    self.engine.cancel(entry_id);
                }
                other => notebook_debug!("Surface effect reached runner: {:?}", other),
            }
        }
    }

    /// Drains every completion received so far.
    pub fn completions(&self) -> Vec<(EntryId, EvalOutcome)> {
        let mut done = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            match event {
                EngineEvent::EvalCompleted { entry_id, result } => {
                    if let Err(err) = &result {
                        notebook_warn!("Entry {} failed: {}", entry_id, err);
                    }
                    done.push((entry_id, map_result(result)));
                }
            }
        }
        done
    }
}

fn map_result(result: Result<EvalReply, EvalError>) -> EvalOutcome {
    match result {
        Ok(reply) => EvalOutcome::Success(reply.body),
        Err(err) => match err.kind {
            FailureKind::ServerError => EvalOutcome::ServerError,
            FailureKind::HttpStatus(code) => EvalOutcome::HttpStatus(code),
            FailureKind::Timeout => EvalOutcome::TimedOut,
            FailureKind::Cancelled => EvalOutcome::Cancelled,
            kind @ (FailureKind::InvalidEndpoint
            | FailureKind::TooLarge { .. }
            | FailureKind::Network) => EvalOutcome::Network(kind.to_string()),
        },
    }
}
