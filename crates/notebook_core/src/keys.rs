pub const ENTER_KEY_CODE: u32 = 13;
pub const ESCAPE_KEY_CODE: u32 = 27;

/// A key press as seen by the document-wide listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key_code: u32,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key_code: u32) -> Self {
        Self {
            key_code,
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Submit,
    CancelPending,
}

/// Maps a key press to the controller shortcut it triggers, if any.
///
/// Enter only submits while Ctrl is held; other modifiers are ignored.
pub fn shortcut_for(press: &KeyPress) -> Option<Shortcut> {
    match press.key_code {
        ENTER_KEY_CODE if press.ctrl => Some(Shortcut::Submit),
        ESCAPE_KEY_CODE => Some(Shortcut::CancelPending),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_enter_submits() {
        let press = KeyPress::new(ENTER_KEY_CODE).with_ctrl();
        assert_eq!(shortcut_for(&press), Some(Shortcut::Submit));
    }

    #[test]
    fn plain_enter_is_left_to_the_editor() {
        assert_eq!(shortcut_for(&KeyPress::new(ENTER_KEY_CODE)), None);
        let shifted = KeyPress {
            shift: true,
            ..KeyPress::new(ENTER_KEY_CODE)
        };
        assert_eq!(shortcut_for(&shifted), None);
    }

    #[test]
    fn extra_modifiers_do_not_block_submit() {
        let press = KeyPress {
            alt: true,
            shift: true,
            ..KeyPress::new(ENTER_KEY_CODE).with_ctrl()
        };
        assert_eq!(shortcut_for(&press), Some(Shortcut::Submit));
    }

    #[test]
    fn ctrl_with_other_key_does_nothing() {
        assert_eq!(shortcut_for(&KeyPress::new(74).with_ctrl()), None);
    }

    #[test]
    fn escape_cancels() {
        assert_eq!(
            shortcut_for(&KeyPress::new(ESCAPE_KEY_CODE)),
            Some(Shortcut::CancelPending)
        );
    }
}
