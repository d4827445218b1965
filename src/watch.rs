//! Live resolution progress for the current merge

mod app;
mod state;
mod ui;
mod watcher;

use state::WatchState;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mergeline::MergeSession;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

type Backend = CrosstermBackend<Stdout>;

/// Take over the terminal, run the TUI until the user quits, then hand the
/// terminal back. An error from the app is returned after restoring.
pub fn run_watch_mode(session: MergeSession) -> io::Result<()> {
    let mut terminal = enter()?;
    let mut state = WatchState::with_session(session);

    // CTRL+C arrives as a key event while in raw mode
    let res = app::run_app(&mut terminal, &mut state);

    leave(&mut terminal)?;
    res
}

fn enter() -> io::Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave(terminal: &mut Terminal<Backend>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}
