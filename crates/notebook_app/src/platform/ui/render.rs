use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use notebook_core::{EntryRowView, EntryStatus, ResultView};

use super::constants::*;
use super::theme::Theme;
use crate::platform::terminal::Screen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub color: Color,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    fn push(mut self, color: Color, text: impl AsRef<str>) -> Self {
        self.spans.push(Span {
            color,
            text: printable(text.as_ref()),
        });
        self
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn truncated(mut self, width: usize) -> Self {
        let mut remaining = width;
        for span in &mut self.spans {
            let len = span.text.chars().count();
            if len > remaining {
                span.text = span.text.chars().take(remaining).collect();
            }
            remaining = remaining.saturating_sub(len);
        }
        self.spans.retain(|span| !span.text.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
    /// Hidden while the editor has no focus.
    pub cursor: Option<(u16, u16)>,
}

/// Lays out the transcript, the editor and the status line for a terminal of
/// `width` x `height` cells.
pub fn compose(screen: &Screen, width: usize, height: usize) -> Frame {
    let theme = screen.theme;
    let width = width.max(1);

    let editor_capacity = EDITOR_VISIBLE_LINES.saturating_add(screen.viewport_margin as usize);
    let editor_rows = editor_capacity
        .min(height.saturating_sub(CHROME_ROWS))
        .max(1);
    let all_editor: Vec<&str> = screen.editor_text.split('\n').collect();
    let editor_start = all_editor.len().saturating_sub(editor_rows);
    let editor_lines = &all_editor[editor_start..];

    let transcript: Vec<Line> = screen
        .rows
        .iter()
        .flat_map(|row| row_lines(row, &theme))
        .collect();
    let budget = height.saturating_sub(editor_lines.len() + CHROME_ROWS);
    let offset = screen
        .scroll_offset
        .min(transcript.len().saturating_sub(budget));
    let end = transcript.len() - offset;
    let start = end.saturating_sub(budget);

    let mut lines: Vec<Line> = transcript[start..end].to_vec();
    lines.push(Line::default().push(theme.chrome, "-".repeat(width)));

    let cursor_row_base = lines.len();
    for line in editor_lines {
        lines.push(
            Line::default()
                .push(theme.prompt, EDITOR_PROMPT)
                .push(theme.source, *line),
        );
    }

    let pending = screen
        .rows
        .iter()
        .filter(|row| row.status == EntryStatus::Pending)
        .count();
    let scrolled = if offset > 0 { " [scrolled]" } else { "" };
    lines.push(Line::default().push(
        theme.chrome,
        format!("{pending} pending{scrolled} | {STATUS_HINT}"),
    ));

    let last_editor = editor_lines.last().copied().unwrap_or_default();
    let cursor_x =
        (EDITOR_PROMPT.chars().count() + printable(last_editor).chars().count()).min(width - 1);
    let cursor_y = cursor_row_base + editor_lines.len().saturating_sub(1);

    Frame {
        lines: lines.into_iter().map(|line| line.truncated(width)).collect(),
        cursor: screen
            .editor_focused
            .then(|| (clamp_u16(cursor_x), clamp_u16(cursor_y))),
    }
}

fn row_lines(row: &EntryRowView, theme: &Theme) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut source = row.source.split('\n');
    let first = source.next().unwrap_or_default();
    lines.push(
        Line::default()
            .push(theme.prompt, SOURCE_PROMPT)
            .push(theme.source, first),
    );
    for more in source {
        lines.push(
            Line::default()
                .push(theme.prompt, CONTINUATION_PROMPT)
                .push(theme.source, more),
        );
    }

    let color = theme.result_color(row.status);
    let indent = " ".repeat(row.arrow.chars().count() + 1);
    for (index, text) in result_text(&row.result).split('\n').enumerate() {
        let lead = if index == 0 {
            Line::default().push(theme.arrow, format!("{} ", row.arrow))
        } else {
            Line::default().push(theme.arrow, indent.clone())
        };
        lines.push(lead.push(color, text));
    }
    lines
}

/// Markup is flattened to markdown; text is shown as is.
fn result_text(result: &ResultView) -> String {
    match result {
        ResultView::Markup(html) => html2md::parse_html(html).trim_end().to_string(),
        ResultView::Text(text) => text.clone(),
    }
}

/// Control characters never reach the terminal; tabs become spaces.
fn printable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push_str("    "),
            ch if ch.is_control() => {}
            ch => out.push(ch),
        }
    }
    out
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Writes a composed frame to the terminal.
pub fn draw(out: &mut impl Write, frame: &Frame) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (y, line) in frame.lines.iter().enumerate() {
        queue!(out, MoveTo(0, clamp_u16(y)))?;
        for span in &line.spans {
            queue!(out, SetForegroundColor(span.color), Print(&span.text))?;
        }
        queue!(out, ResetColor)?;
    }
    match frame.cursor {
        Some((x, y)) => queue!(out, MoveTo(x, y), Show)?,
        None => queue!(out, Hide)?,
    }
    out.flush()
}
