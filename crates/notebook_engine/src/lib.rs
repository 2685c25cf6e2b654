//! Notebook engine: evaluation service client and background request handling.
mod decode;
mod engine;
mod eval;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use engine::EvalHandle;
pub use eval::{EvalSettings, Evaluator, ReqwestEvaluator, EVAL_PATH, FORM_CONTENT_TYPE};
pub use types::{EngineEvent, EntryId, EvalError, EvalReply, FailureKind};
