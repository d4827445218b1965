//! Application state for watch mode

use mergeline::{FileReport, MergeSession, ResolutionProgress};
use std::collections::{HashSet, VecDeque};

/// Maximum number of events to keep in memory
const MAX_EVENTS: usize = 1000;

/// Progress key used before the first commit exists
const UNBORN_REVISION: &str = "unborn";

/// One file that has been unmerged at some point during this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub path: String,
    /// Conflict blocks still present in the file
    pub remaining: usize,
    /// No longer listed as unmerged by git
    pub staged: bool,
    pub error: Option<String>,
}

/// Watch mode application state
pub struct WatchState {
    pub session: MergeSession,
    pub files: Vec<FileRow>,
    pub reports: Vec<FileReport>,
    pub progress: ResolutionProgress,
    pub events: VecDeque<String>,
    pub events_scroll: Option<usize>, // None = stick to bottom, Some(n) = show from event n
}

impl WatchState {
    /// Create WatchState with an initial session
    pub fn with_session(session: MergeSession) -> Self {
        let progress = ResolutionProgress::new(session.revision().unwrap_or(UNBORN_REVISION));
        let mut state = Self {
            session,
            files: Vec::new(),
            reports: Vec::new(),
            progress,
            events: VecDeque::with_capacity(MAX_EVENTS),
            events_scroll: None, // None = stick to bottom
        };

        state.add_event("Watch mode started".to_string());
        state.add_event(format!(
            "Found {} unmerged files ({})",
            state.session.len(),
            state.session.state()
        ));
        state.scan_files();

        state
    }

    pub fn add_event(&mut self, event: String) {
        // Use actual system time for better debugging
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let formatted_event = format!("[{}] {}", timestamp, event);

        self.events.push_back(formatted_event);

        // Remove oldest events if we exceed the limit
        while self.events.len() > MAX_EVENTS {
            self.events.pop_front();
            // Adjust scroll position if needed
            if let Some(scroll) = self.events_scroll
                && scroll > 0
            {
                self.events_scroll = Some(scroll.saturating_sub(1));
            }
        }
    }

    /// Re-discover the session and re-scan every file (called by file watcher)
    pub fn refresh_conflicts(&mut self) -> Result<(), String> {
        let previous_revision = self.progress.revision().to_string();
        self.session.refresh().map_err(|e| e.to_string())?;

        let revision = self.session.revision().unwrap_or(UNBORN_REVISION);
        if revision != previous_revision {
            // A different merge: earlier counts no longer apply
            self.progress = ResolutionProgress::new(revision);
            self.files.clear();
            let message = format!("HEAD moved to {}, progress reset", short(revision));
            self.add_event(message);
        }

        self.scan_files();
        Ok(())
    }

    /// Scan the unmerged files and fold the counts into progress
    fn scan_files(&mut self) {
        self.reports = self.session.scan_all();
        let events = fold_reports(&mut self.files, &mut self.progress, &self.reports);
        for event in events {
            self.add_event(event);
        }
    }

    /// Conflict blocks left across all files
    pub fn remaining_conflicts(&self) -> usize {
        self.files.iter().map(|row| row.remaining).sum()
    }

    /// Files still listed as unmerged
    pub fn unmerged_files(&self) -> usize {
        self.files.iter().filter(|row| !row.staged).count()
    }
}

/// Update the file rows and progress from one round of scan reports.
///
/// A drop in a file's conflict count counts as that many resolutions. A file
/// missing from `reports` was staged and counts as fully resolved. Returns the
/// events worth logging.
fn fold_reports(
    files: &mut Vec<FileRow>,
    progress: &mut ResolutionProgress,
    reports: &[FileReport],
) -> Vec<String> {
    let mut events = Vec::new();
    let mut seen = HashSet::new();

    for report in reports {
        let path = report.path.display().to_string();
        seen.insert(path.clone());

        let index = match files.iter().position(|row| row.path == path) {
            Some(index) => index,
            None => {
                files.push(FileRow {
                    path: path.clone(),
                    remaining: report.count(),
                    staged: false,
                    error: None,
                });
                files.len() - 1
            }
        };
        let row = &mut files[index];
        row.staged = false;

        if let Some(error) = &report.error {
            if row.error.as_ref() != Some(error) {
                events.push(format!("Error scanning {}: {}", path, error));
            }
            row.error = Some(error.clone());
            continue;
        }
        row.error = None;

        progress.report_marker_count(&path, report.count());
        let resolved = row.remaining.saturating_sub(report.count());
        for _ in 0..resolved {
            progress.marker_was_resolved(&path);
        }
        if resolved > 0 {
            events.push(format!(
                "{}: {} resolved ({}/{})",
                path,
                resolved,
                progress.value(&path),
                progress.max(&path)
            ));
        }
        row.remaining = report.count();
    }

    // Files git no longer lists were staged by the user
    for row in files.iter_mut().filter(|row| !seen.contains(&row.path)) {
        if row.staged {
            continue;
        }
        row.staged = true;
        row.remaining = 0;
        row.error = None;
        for _ in progress.value(&row.path)..progress.max(&row.path) {
            progress.marker_was_resolved(&row.path);
        }
        events.push(format!("{}: staged", row.path));
    }

    events
}

fn short(revision: &str) -> &str {
    revision.get(..8).unwrap_or(revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergeline::{ConflictSummary, Source};
    use std::path::PathBuf;

    fn report(path: &str, conflicts: usize) -> FileReport {
        let summary = ConflictSummary {
            start_line: 1,
            end_line: 5,
            ours: "HEAD".to_string(),
            theirs: "feature".to_string(),
            has_base: false,
            base: None,
            top: Source::Ours,
        };
        FileReport {
            path: PathBuf::from(path),
            conflicts: vec![summary; conflicts],
            error: None,
        }
    }

    #[test]
    fn successive_scans_count_resolutions_then_staging() {
        let mut files = Vec::new();
        let mut progress = ResolutionProgress::new("abc");

        let events = fold_reports(&mut files, &mut progress, &[report("a.txt", 3)]);
        assert!(events.is_empty());
        assert_eq!(files[0].remaining, 3);
        assert_eq!((progress.value("a.txt"), progress.max("a.txt")), (0, 3));

        let events = fold_reports(&mut files, &mut progress, &[report("a.txt", 1)]);
        assert_eq!(events, vec!["a.txt: 2 resolved (2/3)".to_string()]);
        assert_eq!(files[0].remaining, 1);
        assert_eq!(progress.value("a.txt"), 2);

        let events = fold_reports(&mut files, &mut progress, &[]);
        assert_eq!(events, vec!["a.txt: staged".to_string()]);
        assert!(files[0].staged);
        assert_eq!(files[0].remaining, 0);
        assert_eq!(progress.value("a.txt"), 3);

        // Staging is only reported once
        assert!(fold_reports(&mut files, &mut progress, &[]).is_empty());
    }

    #[test]
    fn scan_errors_are_reported_once_and_leave_progress_alone() {
        let mut files = Vec::new();
        let mut progress = ResolutionProgress::new("abc");
        let mut failed = report("gone.txt", 0);
        failed.error = Some("I/O error".to_string());

        let events = fold_reports(&mut files, &mut progress, std::slice::from_ref(&failed));
        assert_eq!(events, vec!["Error scanning gone.txt: I/O error".to_string()]);
        assert!(fold_reports(&mut files, &mut progress, &[failed]).is_empty());
        assert!(progress.is_empty());
        assert_eq!(files[0].error.as_deref(), Some("I/O error"));
    }

    #[test]
    fn short_revision_keeps_eight_characters() {
        assert_eq!(short("0123456789abcdef"), "01234567");
        assert_eq!(short("unborn"), "unborn");
    }
}
