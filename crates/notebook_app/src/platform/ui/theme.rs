use crossterm::style::Color;
use notebook_core::EntryStatus;
use notebook_logging::notebook_warn;

/// Terminal palette selected by the editor `theme` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub prompt: Color,
    pub source: Color,
    pub arrow: Color,
    pub chrome: Color,
}

impl Theme {
    pub const IDEA: Theme = Theme {
        prompt: Color::Blue,
        source: Color::Reset,
        arrow: Color::DarkMagenta,
        chrome: Color::DarkGrey,
    };

    pub const PLAIN: Theme = Theme {
        prompt: Color::Reset,
        source: Color::Reset,
        arrow: Color::Reset,
        chrome: Color::Reset,
    };

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "idea" => Self::IDEA,
            "plain" | "default" => Self::PLAIN,
            other => {
                notebook_warn!("Unknown theme '{}', using idea", other);
                Self::IDEA
            }
        }
    }

    pub fn result_color(&self, status: EntryStatus) -> Color {
        match status {
            EntryStatus::Pending | EntryStatus::Cancelled => self.chrome,
            EntryStatus::Resolved => self.source,
            EntryStatus::Failed => Color::Red,
            EntryStatus::TimedOut => Color::Yellow,
        }
    }
}
