use notebook_logging::{notebook_debug, notebook_warn};

use crate::{AppState, Effect, Msg, SubmissionPolicy};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Submit(raw) => {
            let text = raw.trim();
            if text.is_empty() && state.settings().submission == SubmissionPolicy::RejectEmpty {
                notebook_debug!("Ignoring blank submission");
                return (state, Vec::new());
            }

            let source = text.to_string();
            let entry_id = state.push_pending(source.clone());
            // Surface mutations must precede the request.
            vec![
                Effect::ClearEditor,
                Effect::AppendEntry(entry_id),
                Effect::ScrollToBottom,
                Effect::PostEval { entry_id, source },
            ]
        }
        Msg::EvalCompleted { entry_id, outcome } => {
            if state.complete(entry_id, outcome) {
                vec![Effect::RefreshEntry(entry_id)]
            } else {
                notebook_warn!("Ignoring completion for unknown or settled entry {}", entry_id);
                Vec::new()
            }
        }
        Msg::CancelPending => state
            .pending_ids()
            .into_iter()
            .map(|entry_id| Effect::CancelEval { entry_id })
            .collect(),
    };

    (state, effects)
}
