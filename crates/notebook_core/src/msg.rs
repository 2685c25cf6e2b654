use crate::EntryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted the editor content (untrimmed).
    Submit(String),
    /// Evaluation service finished (or gave up on) an entry.
    EvalCompleted {
        entry_id: EntryId,
        outcome: EvalOutcome,
    },
    /// User asked to abandon every in-flight evaluation.
    CancelPending,
}

/// How a single evaluation request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    /// HTTP 200 with the decoded response body.
    Success(String),
    /// HTTP 500.
    ServerError,
    /// Any other HTTP status.
    HttpStatus(u16),
    /// No usable response: connection refused, reset, oversized body.
    Network(String),
    TimedOut,
    Cancelled,
}
