use crate::EntryId;

/// Side effects requested by [`crate::update`].
///
/// Surface effects are applied by the controller in order; `PostEval` and
/// `CancelEval` are handed to the platform for the evaluation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ClearEditor,
    AppendEntry(EntryId),
    RefreshEntry(EntryId),
    ScrollToBottom,
    PostEval { entry_id: EntryId, source: String },
    CancelEval { entry_id: EntryId },
}

impl Effect {
    /// True for effects that leave the UI thread.
    pub fn is_network(&self) -> bool {
        matches!(self, Effect::PostEval { .. } | Effect::CancelEval { .. })
    }
}
