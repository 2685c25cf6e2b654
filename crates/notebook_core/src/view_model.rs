use crate::{Entry, EntryId, EntryStatus, ResultRendering};

/// Glyph shown between a snippet and its result.
pub const ARROW: &str = "\u{21D2}";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptView {
    pub rows: Vec<EntryRowView>,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRowView {
    pub entry_id: EntryId,
    pub source: String,
    pub arrow: &'static str,
    pub result: ResultView,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Service output, inserted without escaping.
    Markup(String),
    /// Literal text (placeholders, failure notices, untrusted output).
    Text(String),
}

impl ResultView {
    pub fn as_str(&self) -> &str {
        match self {
            ResultView::Markup(text) | ResultView::Text(text) => text,
        }
    }
}

impl EntryRowView {
    pub(crate) fn from_entry(entry: &Entry, rendering: ResultRendering) -> Self {
        let result = match (entry.status, rendering) {
            (EntryStatus::Resolved, ResultRendering::TrustedMarkup) => {
                ResultView::Markup(entry.result.clone())
            }
            _ => ResultView::Text(entry.result.clone()),
        };
        Self {
            entry_id: entry.id,
            source: entry.source.clone(),
            arrow: ARROW,
            result,
            status: entry.status,
        }
    }
}
