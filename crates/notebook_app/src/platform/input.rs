use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use notebook_core::{shortcut_for, KeyPress, ENTER_KEY_CODE, ESCAPE_KEY_CODE};

const BACKSPACE_KEY_CODE: u32 = 8;
const TAB_KEY_CODE: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Key claimed by the controller's document-wide listener.
    Shortcut(KeyPress),
    Insert(char),
    Newline,
    Backspace,
    ScrollUp,
    ScrollDown,
    Quit,
    Ignore,
}

/// DOM-style key code for a terminal key.
pub fn key_press(event: &KeyEvent) -> KeyPress {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let key_code = match event.code {
        KeyCode::Enter => ENTER_KEY_CODE,
        // Terminals without keyboard enhancement send Ctrl+Enter as Ctrl+J.
        KeyCode::Char('j') | KeyCode::Char('J') if ctrl => ENTER_KEY_CODE,
        KeyCode::Esc => ESCAPE_KEY_CODE,
        KeyCode::Backspace => BACKSPACE_KEY_CODE,
        KeyCode::Tab => TAB_KEY_CODE,
        KeyCode::Char(ch) => ch.to_ascii_uppercase() as u32,
        _ => 0,
    };
    KeyPress {
        key_code,
        ctrl,
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    }
}

pub fn classify(event: &KeyEvent) -> InputAction {
    if event.kind == KeyEventKind::Release {
        return InputAction::Ignore;
    }

    let press = key_press(event);
    if shortcut_for(&press).is_some() {
        return InputAction::Shortcut(press);
    }

    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => InputAction::Quit,
        KeyCode::Char(_) if ctrl => InputAction::Ignore,
        KeyCode::Char(ch) => InputAction::Insert(ch),
        KeyCode::Tab => InputAction::Insert('\t'),
        KeyCode::Enter => InputAction::Newline,
        KeyCode::Backspace => InputAction::Backspace,
        KeyCode::PageUp => InputAction::ScrollUp,
        KeyCode::PageDown => InputAction::ScrollDown,
        _ => InputAction::Ignore,
    }
}
