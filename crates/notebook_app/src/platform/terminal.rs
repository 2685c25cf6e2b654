//! Terminal-backed surfaces. Both the editor and the transcript draw into one
//! shared [`Screen`], the way two elements share one page.

use std::cell::RefCell;
use std::rc::Rc;

use notebook_core::{Document, EditingSurface, EditorOptions, EntryRowView, TranscriptSurface};
use notebook_logging::notebook_debug;

use super::ui::constants::{EDITOR_ID, TRANSCRIPT_ID};
use super::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct Screen {
    pub(crate) editor_text: String,
    pub(crate) editor_focused: bool,
    pub(crate) viewport_margin: u32,
    pub(crate) theme: Theme,
    pub(crate) rows: Vec<EntryRowView>,
    /// Transcript lines hidden below the bottom edge.
    pub(crate) scroll_offset: usize,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            editor_text: String::new(),
            editor_focused: false,
            viewport_margin: u32::MAX,
            theme: Theme::IDEA,
            rows: Vec::new(),
            scroll_offset: 0,
            dirty: true,
        }
    }
}

impl Screen {
    pub fn shared() -> SharedScreen {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.dirty = true;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.dirty = true;
    }
}

pub type SharedScreen = Rc<RefCell<Screen>>;

pub struct TerminalDocument {
    screen: SharedScreen,
    containers: Vec<&'static str>,
}

impl TerminalDocument {
    pub fn new(screen: SharedScreen) -> Self {
        Self {
            screen,
            containers: vec![TRANSCRIPT_ID, EDITOR_ID],
        }
    }

    fn has(&self, id: &str) -> bool {
        self.containers.iter().any(|known| *known == id)
    }
}

impl Document for TerminalDocument {
    type Editor = TerminalEditor;
    type Transcript = TerminalTranscript;

    fn transcript(&mut self, id: &str) -> Option<TerminalTranscript> {
        self.has(id).then(|| TerminalTranscript {
            screen: self.screen.clone(),
        })
    }

    fn mount_editor(&mut self, id: &str, options: &EditorOptions) -> Option<TerminalEditor> {
        if !self.has(id) {
            return None;
        }
        {
            let mut screen = self.screen.borrow_mut();
            screen.theme = Theme::from_name(&options.theme);
            screen.viewport_margin = options.viewport_margin;
            screen.mark_dirty();
        }
        notebook_debug!("Mounted editor theme={} margin={}", options.theme, options.viewport_margin);
        Some(TerminalEditor {
            screen: self.screen.clone(),
        })
    }
}

pub struct TerminalEditor {
    screen: SharedScreen,
}

impl TerminalEditor {
    pub fn insert_char(&mut self, ch: char) {
        let mut screen = self.screen.borrow_mut();
        screen.editor_text.push(ch);
        screen.mark_dirty();
    }

    /// Inserts pasted text, normalizing line endings.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let mut screen = self.screen.borrow_mut();
        screen.editor_text.push_str(&normalized);
        screen.mark_dirty();
    }

    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        let mut screen = self.screen.borrow_mut();
        if screen.editor_text.pop().is_some() {
            screen.mark_dirty();
        }
    }
}

impl EditingSurface for TerminalEditor {
    fn value(&self) -> String {
        self.screen.borrow().editor_text.clone()
    }

    fn set_value(&mut self, text: &str) {
        let mut screen = self.screen.borrow_mut();
        screen.editor_text = text.to_string();
        screen.mark_dirty();
    }

    fn focus(&mut self) {
        let mut screen = self.screen.borrow_mut();
        screen.editor_focused = true;
        screen.mark_dirty();
    }
}

pub struct TerminalTranscript {
    screen: SharedScreen,
}

impl TranscriptSurface for TerminalTranscript {
    fn append(&mut self, row: &EntryRowView) {
        let mut screen = self.screen.borrow_mut();
        screen.rows.push(row.clone());
        screen.mark_dirty();
    }

    fn refresh(&mut self, index: usize, row: &EntryRowView) {
        let mut screen = self.screen.borrow_mut();
        if let Some(slot) = screen.rows.get_mut(index) {
            *slot = row.clone();
            screen.mark_dirty();
        }
    }

    fn scroll_to_bottom(&mut self) {
        let mut screen = self.screen.borrow_mut();
        screen.scroll_offset = 0;
        screen.mark_dirty();
    }
}
