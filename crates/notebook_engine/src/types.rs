use std::fmt;

pub type EntryId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    EvalCompleted {
        entry_id: EntryId,
        result: Result<EvalReply, EvalError>,
    },
}

/// A 200 response from the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalReply {
    pub body: String,
    pub content_type: Option<String>,
    pub encoding_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct EvalError {
    pub kind: FailureKind,
    pub message: String,
}

impl EvalError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    /// HTTP 500.
    ServerError,
    /// Any status other than 200 or 500.
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::ServerError => write!(f, "server error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
