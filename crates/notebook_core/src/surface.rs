//! Collaborator seams: the editing widget, the transcript display and the
//! document that owns both.

use crate::EntryRowView;

/// Editor configuration applied when the widget is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub theme: String,
    /// Lines rendered beyond the visible area. `u32::MAX` renders everything.
    pub viewport_margin: u32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            theme: "idea".to_string(),
            viewport_margin: u32::MAX,
        }
    }
}

/// A text-editing widget.
pub trait EditingSurface {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);
    fn focus(&mut self);
}

/// The area transcript rows are rendered into.
pub trait TranscriptSurface {
    fn append(&mut self, row: &EntryRowView);
    /// Re-renders the row at `index` in transcript order.
    fn refresh(&mut self, index: usize, row: &EntryRowView);
    fn scroll_to_bottom(&mut self);
}

/// Resolves named containers into surfaces.
pub trait Document {
    type Editor: EditingSurface;
    type Transcript: TranscriptSurface;

    fn transcript(&mut self, id: &str) -> Option<Self::Transcript>;
    fn mount_editor(&mut self, id: &str, options: &EditorOptions) -> Option<Self::Editor>;
}
