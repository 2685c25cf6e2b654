use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use notebook_logging::{notebook_debug, notebook_info};
use tokio_util::sync::CancellationToken;

use crate::eval::{EvalSettings, Evaluator, ReqwestEvaluator};
use crate::{EngineEvent, EntryId, EvalError, EvalReply, FailureKind};

enum EngineCommand {
    Submit { entry_id: EntryId, source: String },
    Cancel { entry_id: EntryId },
}

type InFlight = Arc<Mutex<HashMap<EntryId, CancellationToken>>>;

/// Runs evaluations on a background tokio runtime and reports completions
/// through a channel polled by the UI thread.
pub struct EvalHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EvalHandle {
    pub fn new(settings: EvalSettings) -> Result<Self, EvalError> {
        let deadline = settings.request_timeout;
        let evaluator = ReqwestEvaluator::new(settings)?;
        Self::with_evaluator(Arc::new(evaluator), deadline)
    }

    /// Every request is abandoned with `FailureKind::Timeout` once `deadline` elapses.
    pub fn with_evaluator(
        evaluator: Arc<dyn Evaluator>,
        deadline: Duration,
    ) -> Result<Self, EvalError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|err| EvalError::new(FailureKind::Network, err.to_string()))?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let in_flight: InFlight = Arc::default();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit { entry_id, source } => {
                        let token = CancellationToken::new();
                        if let Ok(mut tokens) = in_flight.lock() {
                            tokens.insert(entry_id, token.clone());
                        }
                        let evaluator = evaluator.clone();
                        let event_tx = event_tx.clone();
                        let in_flight = in_flight.clone();
                        runtime.spawn(async move {
                            let result =
                                run_one(evaluator.as_ref(), entry_id, &source, deadline, token)
                                    .await;
                            if let Ok(mut tokens) = in_flight.lock() {
                                tokens.remove(&entry_id);
                            }
                            let _ = event_tx.send(EngineEvent::EvalCompleted { entry_id, result });
                        });
                    }
                    EngineCommand::Cancel { entry_id } => {
                        let token = in_flight
                            .lock()
                            .ok()
                            .and_then(|tokens| tokens.get(&entry_id).cloned());
                        match token {
                            Some(token) => token.cancel(),
                            None => notebook_debug!("Cancel for idle entry {}", entry_id),
                        }
                    }
                }
            }
            notebook_info!("Evaluation engine stopped");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, entry_id: EntryId, source: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            entry_id,
            source: source.into(),
        });
    }

    pub fn cancel(&self, entry_id: EntryId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { entry_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_one(
    evaluator: &dyn Evaluator,
    entry_id: EntryId,
    source: &str,
    deadline: Duration,
    token: CancellationToken,
) -> Result<EvalReply, EvalError> {
    tokio::select! {
        _ = token.cancelled() => {
            Err(EvalError::new(FailureKind::Cancelled, "cancelled by user"))
        }
        outcome = tokio::time::timeout(deadline, evaluator.evaluate(entry_id, source)) => {
            match outcome {
                Ok(result) => result,
                Err(_) => Err(EvalError::new(
                    FailureKind::Timeout,
                    format!("no response within {deadline:?}"),
                )),
            }
        }
    }
}
