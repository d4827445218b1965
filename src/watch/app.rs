//! Event loop and application orchestration

use super::{
    state::WatchState,
    ui,
    watcher::{self, Change},
};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::Terminal;
use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Quiet period after the last change before the working tree is re-scanned
const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Changes seen since the last re-scan
#[derive(Default)]
struct Pending {
    since: Option<Instant>,
    git: bool,
    /// Conflicted files that were edited, relative to the workdir
    edited: BTreeSet<PathBuf>,
}

impl Pending {
    fn record(&mut self, state: &WatchState, change: Change) {
        match change {
            Change::GitState => self.git = true,
            Change::File(path) => {
                if let Some(file) = state.session.find(&path) {
                    self.edited.insert(file.path.clone());
                }
            }
        }
        self.since = Some(Instant::now());
    }

    fn is_settled(&self) -> bool {
        self.since.is_some_and(|since| since.elapsed() > SETTLE_DELAY)
    }

    fn describe(&self) -> String {
        if self.git {
            "Git operation - ".to_string()
        } else if self.edited.is_empty() {
            "Files changed - ".to_string()
        } else {
            let names: Vec<String> = self
                .edited
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            format!("Edited {} - ", names.join(", "))
        }
    }
}

/// Visible rows in the event log (10 lines minus borders)
const EVENT_WINDOW_HEIGHT: usize = 8;

/// Run the main application event loop
pub fn run_app<B>(terminal: &mut Terminal<B>, state: &mut WatchState) -> io::Result<()>
where
    B: ratatui::backend::Backend,
    B::Error: Into<io::Error>,
{
    // Set up file system watcher
    let (tx, rx) = mpsc::channel();
    let _watcher = watcher::setup_watcher(state, tx)?;

    let mut pending = Pending::default();

    loop {
        // Draw UI - continue on error to prevent panic
        if let Err(e) = terminal.draw(|f| ui::ui(f, state)).map_err(Into::into) {
            state.add_event(format!("UI draw error: {} - attempting recovery", e));
        }

        // Drain file system events without blocking
        while let Ok(change) = rx.try_recv() {
            pending.record(state, change);
        }

        if pending.is_settled() {
            let prefix = std::mem::take(&mut pending).describe();
            refresh(state, &prefix);
        }

        // Poll for keyboard events with timeout - handle errors gracefully
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    // Handle CTRL+C (crossterm captures it in raw mode)
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        state.add_event("CTRL+C pressed, exiting...".to_string());
                        return Ok(());
                    }

                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('r') => refresh(state, "Manual refresh - "),
                        KeyCode::Up => scroll_up(state),
                        KeyCode::Down => scroll_down(state),
                        _ => {}
                    }
                }
                Ok(_) => {
                    // Other event types (mouse, resize, etc.) - ignore
                }
                Err(e) => {
                    state.add_event(format!("Event read error: {} - continuing", e));
                }
            },
            Ok(false) => {}
            Err(e) => {
                state.add_event(format!("Event poll error: {} - continuing", e));
            }
        }
    }
}

/// Re-scan and log a single summary line
fn refresh(state: &mut WatchState, prefix: &str) {
    if let Err(e) = state.refresh_conflicts() {
        state.add_event(format!("{}refresh error: {}", prefix, e));
        return;
    }

    let msg = if state.remaining_conflicts() == 0 {
        format!(
            "{}Rescanned: {} unmerged files, no markers left",
            prefix,
            state.unmerged_files()
        )
    } else {
        format!(
            "{}Rescanned: {} conflicts left in {} unmerged files",
            prefix,
            state.remaining_conflicts(),
            state.unmerged_files()
        )
    };
    state.add_event(msg);
}

fn scroll_up(state: &mut WatchState) {
    let current_scroll = match state.events_scroll {
        // At the bottom: start from the first visible line
        None => state.events.len().saturating_sub(EVENT_WINDOW_HEIGHT),
        Some(scroll) => scroll,
    };

    if current_scroll > 0 {
        state.events_scroll = Some(current_scroll - 1);
    }
}

fn scroll_down(state: &mut WatchState) {
    if let Some(scroll) = state.events_scroll {
        let max_scroll = state.events.len().saturating_sub(EVENT_WINDOW_HEIGHT);
        if scroll < max_scroll {
            state.events_scroll = Some(scroll + 1);
        } else {
            // Reached the bottom, switch back to auto-scroll
            state.events_scroll = None;
        }
    }
}
