//! File system watcher with gitignore filtering

use super::state::WatchState;
use ignore::gitignore::Gitignore;
use notify::event::ModifyKind;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// What a relevant file system event touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Change {
    /// Merge bookkeeping under `.git/` (index, HEAD, sequencer state)
    GitState,
    /// A working tree file
    File(PathBuf),
}

/// Git state files whose changes mean a merge step happened
const GIT_STATE_FILES: &[&str] = &[
    "/.git/index",
    "/.git/HEAD",
    "/.git/MERGE_HEAD",
    "/.git/REBASE_HEAD",
    "/.git/CHERRY_PICK_HEAD",
    "/.git/REVERT_HEAD",
    "/.git/rebase-merge/",
    "/.git/rebase-apply/",
    "/.git/refs/",
];

/// Setup file system watcher for the working directory
pub fn setup_watcher(
    state: &mut WatchState,
    tx: mpsc::Sender<Change>,
) -> io::Result<RecommendedWatcher> {
    let repo_root = state.session.workdir().to_path_buf();
    let (gitignore, err) = Gitignore::new(repo_root.join(".gitignore"));
    if let Some(e) = err {
        state.add_event(format!("Warning loading .gitignore: {}", e));
    }

    let watched_root = repo_root.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res
                && should_process_event(&event, &gitignore, &watched_root)
            {
                let _ = tx.send(classify(&event));
            }
        },
        Config::default(),
    )
    .map_err(io::Error::other)?;

    watcher
        .watch(&repo_root, RecursiveMode::Recursive)
        .map_err(io::Error::other)?;
    state.add_event(format!("Watching {}", repo_root.display()));

    Ok(watcher)
}

fn classify(event: &notify::Event) -> Change {
    let git = event
        .paths
        .iter()
        .any(|p| p.to_string_lossy().contains("/.git/"));
    match event.paths.first() {
        Some(path) if !git => Change::File(path.clone()),
        _ => Change::GitState,
    }
}

/// Determine if a file system event should trigger a rescan
fn should_process_event(event: &notify::Event, gitignore: &Gitignore, repo_root: &Path) -> bool {
    let is_relevant = event.paths.iter().any(|path| {
        let path_str = path.to_string_lossy();

        // Skip temporary files from editors and build systems
        if path_str.ends_with(".tmp")
            || path_str.ends_with(".swp")
            || path_str.ends_with("~")
            || path_str.contains(".tmp.")
        {
            return false;
        }

        if path_str.contains("/.git/") {
            // Lock files trigger the debounce; the rename that follows carries the change
            return GIT_STATE_FILES.iter().any(|file| path_str.contains(file))
                || path_str.ends_with(".lock");
        }

        // Make path relative to repo root for gitignore matching
        let relative_path = path.strip_prefix(repo_root).unwrap_or(path.as_path());

        let is_dir = path.is_dir();
        !gitignore
            .matched_path_or_any_parents(relative_path, is_dir)
            .is_ignore()
    });

    if !is_relevant {
        return false;
    }

    // Filter for only actual content changes, not metadata
    matches!(
        event.kind,
        EventKind::Modify(ModifyKind::Data(_)) |  // Actual content changes
        EventKind::Modify(ModifyKind::Name(_)) |  // Renames (editors save atomically)
        EventKind::Create(_) |
        EventKind::Remove(_)
    )
}
