// Container ids resolved by the controller at setup.
pub const TRANSCRIPT_ID: &str = "transcript";
pub const EDITOR_ID: &str = "editor";

pub const SOURCE_PROMPT: &str = "> ";
pub const CONTINUATION_PROMPT: &str = ". ";
pub const EDITOR_PROMPT: &str = "| ";
pub const STATUS_HINT: &str = "Ctrl+Enter evaluate | Esc cancel | PgUp/PgDn scroll | Ctrl+D quit";

/// Rows taken by the separator and the status line.
pub const CHROME_ROWS: usize = 2;
/// Editor lines shown before `viewport_margin` extends the view.
pub const EDITOR_VISIBLE_LINES: usize = 8;
pub const SCROLL_STEP: usize = 5;
