use serde::{Deserialize, Serialize};

use crate::view_model::{EntryRowView, TranscriptView};
use crate::EvalOutcome;

pub type EntryId = u64;

pub const PLACEHOLDER_TEXT: &str = "(waiting for server...)";
pub const FAILED_TEXT: &str = "Failed!";
pub const TIMED_OUT_TEXT: &str = "Timed out!";
pub const CANCELLED_TEXT: &str = "Cancelled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryStatus {
    #[default]
    Pending,
    Resolved,
    Failed,
    TimedOut,
    Cancelled,
}

impl EntryStatus {
    pub fn is_terminal(self) -> bool {
        self != EntryStatus::Pending
    }
}

/// How a successful response body reaches the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultRendering {
    /// The evaluation service is trusted; its body is shown as markup, verbatim.
    #[default]
    TrustedMarkup,
    /// The body is escaped and shown as text.
    PlainText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Blank editor content is still sent to the service.
    #[default]
    AllowEmpty,
    /// Blank editor content is ignored.
    RejectEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranscriptSettings {
    pub rendering: ResultRendering,
    pub submission: SubmissionPolicy,
}

/// One submitted snippet and its eventual result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub source: String,
    pub result: String,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    entries: Vec<Entry>,
    next_id: EntryId,
    settings: TranscriptSettings,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(TranscriptSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TranscriptSettings) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            settings,
            dirty: false,
        }
    }

    pub fn settings(&self) -> TranscriptSettings {
        self.settings
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.position(id).map(|index| &self.entries[index])
    }

    /// Index of the entry in transcript order.
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |entry| entry.id).ok()
    }

    pub fn pending_ids(&self) -> Vec<EntryId> {
        self.entries
            .iter()
            .filter(|entry| entry.status == EntryStatus::Pending)
            .map(|entry| entry.id)
            .collect()
    }

    pub fn view(&self) -> TranscriptView {
        TranscriptView {
            rows: self
                .entries
                .iter()
                .map(|entry| EntryRowView::from_entry(entry, self.settings.rendering))
                .collect(),
            pending: self
                .entries
                .iter()
                .filter(|entry| entry.status == EntryStatus::Pending)
                .count(),
        }
    }

    pub fn row(&self, id: EntryId) -> Option<EntryRowView> {
        self.entry(id)
            .map(|entry| EntryRowView::from_entry(entry, self.settings.rendering))
    }

    /// Returns whether state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn push_pending(&mut self, source: String) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            source,
            result: PLACEHOLDER_TEXT.to_string(),
            status: EntryStatus::Pending,
        });
        self.dirty = true;
        id
    }

    /// Moves a pending entry to its terminal status. Returns false when the
    /// entry is unknown or already settled.
    pub(crate) fn complete(&mut self, id: EntryId, outcome: EvalOutcome) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let entry = &mut self.entries[index];
        if entry.status.is_terminal() {
            return false;
        }

        let (status, result) = match outcome {
            EvalOutcome::Success(body) => (EntryStatus::Resolved, body),
            EvalOutcome::ServerError => (EntryStatus::Failed, FAILED_TEXT.to_string()),
            EvalOutcome::HttpStatus(code) => {
                (EntryStatus::Failed, format!("{FAILED_TEXT} (HTTP {code})"))
            }
            EvalOutcome::Network(reason) => {
                (EntryStatus::Failed, format!("{FAILED_TEXT} ({reason})"))
            }
            EvalOutcome::TimedOut => (EntryStatus::TimedOut, TIMED_OUT_TEXT.to_string()),
            EvalOutcome::Cancelled => (EntryStatus::Cancelled, CANCELLED_TEXT.to_string()),
        };
        entry.status = status;
        entry.result = result;
        self.dirty = true;
        true
    }
}
