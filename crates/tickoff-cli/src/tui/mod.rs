mod app;
mod render;

use std::{io, time::Duration};

use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tickoff_core::storage::KeyValueStore;
use tickoff_task::TaskBoard;
use tracing::info;

use app::App;

/// Interactive task list. Press `q` or `Esc` in normal mode to exit.
pub fn launch<S: KeyValueStore>(board: TaskBoard<S>) -> Result<()> {
    // Guard restores the terminal even if we early-return.
    let guard = TerminalGuard::enter()?;
    let mut terminal = guard.terminal()?;
    let mut app = App::new(board);
    info!("tui started");

    while !app.should_quit() {
        terminal.draw(|frame| render::draw(frame, &app))?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                // Windows also reports releases; act on presses only.
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }
    }

    info!("tui exited");
    Ok(())
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Enter alternate screen to avoid polluting the shell buffer.
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }

    fn terminal(&self) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; errors are logged but not propagated from Drop.
        if let Err(err) = disable_raw_mode() {
            eprintln!("failed to disable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
            eprintln!("failed to restore terminal: {err}");
        }
    }
}
