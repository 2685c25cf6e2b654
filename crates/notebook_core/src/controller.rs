use notebook_logging::{notebook_debug, notebook_info, notebook_warn};

use crate::{
    shortcut_for, update, AppState, Document, EditingSurface, EditorOptions, Effect, EntryId,
    EvalOutcome, KeyPress, Msg, Shortcut, TranscriptSettings, TranscriptSurface, TranscriptView,
};

/// Binds an editing surface to a transcript surface and drives one
/// request/response cycle per submission.
///
/// Methods return the network effects (`PostEval`, `CancelEval`) the caller
/// must hand to the evaluation engine; surface effects are applied here.
pub struct TranscriptController<D: Document> {
    state: AppState,
    transcript: Option<D::Transcript>,
    editor: Option<D::Editor>,
}

impl<D: Document> TranscriptController<D> {
    /// Resolves both containers and mounts the editor. A missing container
    /// leaves the matching reference unset; no error is reported.
    pub fn setup(
        document: &mut D,
        transcript_id: &str,
        editor_id: &str,
        options: &EditorOptions,
        settings: TranscriptSettings,
    ) -> Self {
        let transcript = document.transcript(transcript_id);
        if transcript.is_none() {
            notebook_warn!("Transcript container '{}' not found", transcript_id);
        }

        let mut editor = document.mount_editor(editor_id, options);
        match editor.as_mut() {
            Some(editor) => editor.focus(),
            None => notebook_warn!("Editor container '{}' not found", editor_id),
        }

        notebook_info!(
            "Controller ready transcript={} editor={} theme={}",
            transcript_id,
            editor_id,
            options.theme
        );

        Self {
            state: AppState::with_settings(settings),
            transcript,
            editor,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.transcript.is_some() && self.editor.is_some()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn view(&self) -> TranscriptView {
        self.state.view()
    }

    pub fn editor(&self) -> Option<&D::Editor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut D::Editor> {
        self.editor.as_mut()
    }

    pub fn transcript(&self) -> Option<&D::Transcript> {
        self.transcript.as_ref()
    }

    /// Document-wide key listener.
    pub fn handle_key(&mut self, press: KeyPress) -> Vec<Effect> {
        match shortcut_for(&press) {
            Some(Shortcut::Submit) => self.evaluate_editor(),
            Some(Shortcut::CancelPending) => self.cancel_pending(),
            None => Vec::new(),
        }
    }

    /// Submits the current editor content. Without a transcript the editor
    /// is cleared and nothing is recorded or sent.
    pub fn evaluate_editor(&mut self) -> Vec<Effect> {
        let Some(editor) = self.editor.as_mut() else {
            notebook_warn!("Submission ignored: no editor mounted");
            return Vec::new();
        };
        if self.transcript.is_none() {
            editor.set_value("");
            notebook_warn!("Submission dropped: no transcript to show it in");
            return Vec::new();
        }
        let text = editor.value();
        notebook_debug!("Submitting {} bytes", text.len());
        self.dispatch(Msg::Submit(text))
    }

    pub fn cancel_pending(&mut self) -> Vec<Effect> {
        self.dispatch(Msg::CancelPending)
    }

    /// Fills in the result of a finished evaluation.
    pub fn complete(&mut self, entry_id: EntryId, outcome: EvalOutcome) -> Vec<Effect> {
        self.dispatch(Msg::EvalCompleted { entry_id, outcome })
    }

    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut outgoing = Vec::new();
        for effect in effects {
            if effect.is_network() {
                outgoing.push(effect);
            } else {
                self.apply(effect);
            }
        }
        outgoing
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ClearEditor => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_value("");
                }
            }
            Effect::AppendEntry(entry_id) => {
                if let (Some(transcript), Some(row)) =
                    (self.transcript.as_mut(), self.state.row(entry_id))
                {
                    transcript.append(&row);
                }
            }
            Effect::RefreshEntry(entry_id) => {
                if let (Some(transcript), Some(index), Some(row)) = (
                    self.transcript.as_mut(),
                    self.state.position(entry_id),
                    self.state.row(entry_id),
                ) {
                    transcript.refresh(index, &row);
                }
            }
            Effect::ScrollToBottom => {
                if let Some(transcript) = self.transcript.as_mut() {
                    transcript.scroll_to_bottom();
                }
            }
            Effect::PostEval { .. } | Effect::CancelEval { .. } => {}
        }
    }
}
