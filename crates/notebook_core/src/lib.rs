//! Notebook core: pure transcript state machine, key shortcuts, view model
//! and the controller that binds them to an editing surface.
mod controller;
mod effect;
mod keys;
mod msg;
mod state;
mod surface;
mod update;
mod view_model;

pub use controller::TranscriptController;
pub use effect::Effect;
pub use keys::{shortcut_for, KeyPress, Shortcut, ENTER_KEY_CODE, ESCAPE_KEY_CODE};
pub use msg::{EvalOutcome, Msg};
pub use state::{
    AppState, Entry, EntryId, EntryStatus, ResultRendering, SubmissionPolicy, TranscriptSettings,
    CANCELLED_TEXT, FAILED_TEXT, PLACEHOLDER_TEXT, TIMED_OUT_TEXT,
};
pub use surface::{Document, EditingSurface, EditorOptions, TranscriptSurface};
pub use update::update;
pub use view_model::{EntryRowView, ResultView, TranscriptView, ARROW};
