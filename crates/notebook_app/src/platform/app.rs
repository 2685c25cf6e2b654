use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use notebook_core::TranscriptController;
use notebook_logging::{notebook_info, notebook_warn};

use super::cli::Cli;
use super::config::NotebookConfig;
use super::effects::EffectRunner;
use super::input::{classify, InputAction};
use super::logging;
use super::terminal::{Screen, SharedScreen, TerminalDocument};
use super::ui;
use super::ui::constants::{EDITOR_ID, SCROLL_STEP, TRANSCRIPT_ID};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let mut config = NotebookConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    logging::initialize(cli.log, config.log_level()?);
    match &config.source {
        Some(path) => notebook_info!("Loaded config from {:?}", path),
        None => notebook_info!("No config file; using defaults"),
    }

    let runner = EffectRunner::new(config.eval_settings()?)
        .context("failed to start evaluation engine")?;

    let screen = Screen::shared();
    let mut document = TerminalDocument::new(screen.clone());
    let mut controller = TranscriptController::setup(
        &mut document,
        TRANSCRIPT_ID,
        EDITOR_ID,
        &config.editor_options(),
        config.transcript_settings(),
    );

    let mut terminal = TerminalGuard::enter().context("failed to prepare terminal")?;
    let result = event_loop(&mut terminal, &screen, &mut controller, &runner);
    drop(terminal);

    let view = controller.view();
    notebook_info!(
        "Session ended entries={} pending={}",
        view.rows.len(),
        view.pending
    );
    result
}

fn event_loop(
    terminal: &mut TerminalGuard,
    screen: &SharedScreen,
    controller: &mut TranscriptController<TerminalDocument>,
    runner: &EffectRunner,
) -> anyhow::Result<()> {
    loop {
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => match classify(&key) {
                    InputAction::Shortcut(press) => runner.enqueue(controller.handle_key(press)),
                    InputAction::Quit => return Ok(()),
                    InputAction::Insert(ch) => {
                        if let Some(editor) = controller.editor_mut() {
                            editor.insert_char(ch);
                        }
                    }
                    InputAction::Newline => {
                        if let Some(editor) = controller.editor_mut() {
                            editor.newline();
                        }
                    }
                    InputAction::Backspace => {
                        if let Some(editor) = controller.editor_mut() {
                            editor.backspace();
                        }
                    }
                    InputAction::ScrollUp => screen.borrow_mut().scroll_up(SCROLL_STEP),
                    InputAction::ScrollDown => screen.borrow_mut().scroll_down(SCROLL_STEP),
                    InputAction::Ignore => {}
                },
                Event::Paste(text) => {
                    if let Some(editor) = controller.editor_mut() {
                        editor.insert_str(&text);
                    }
                }
                Event::Resize(..) => screen.borrow_mut().mark_dirty(),
                _ => {}
            }
        }

        for (entry_id, outcome) in runner.completions() {
            runner.enqueue(controller.complete(entry_id, outcome));
        }

        let transcript_changed = controller.state_mut().consume_dirty();
        let screen_changed = screen.borrow_mut().take_dirty();
        if transcript_changed || screen_changed {
            terminal.draw(&screen.borrow())?;
        }
    }
}

struct TerminalGuard {
    stdout: Stdout,
    keyboard_enhancement: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableBracketedPaste)?;
        let keyboard_enhancement = match terminal::supports_keyboard_enhancement() {
            Ok(true) => stdout
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES,
                ))
                .is_ok(),
            _ => false,
        };
        if !keyboard_enhancement {
            notebook_warn!("Keyboard enhancement unavailable; Ctrl+J submits");
        }
        Ok(Self {
            stdout,
            keyboard_enhancement,
        })
    }

    fn draw(&mut self, screen: &Screen) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let frame = ui::render::compose(screen, usize::from(width), usize::from(height));
        ui::render::draw(&mut self.stdout, &frame)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhancement {
            let _ = self.stdout.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.stdout.execute(DisableBracketedPaste);
        let _ = self.stdout.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
