//! Conflict marker scanning for ConflictedFile and MergeSession
//!
//! This module extends ConflictedFile and MergeSession with marker scanning,
//! following the pattern of splitting impl blocks across files by
//! functionality.

use super::error::{RepositoryError, Result};
use super::{ConflictedFile, MergeSession};
use crate::buffer::{Range, TextBuffer};
use crate::conflict::{Conflict, Source, scan_for_conflicts};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One conflict as reported to users; lines are 1-based and inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub start_line: usize,
    pub end_line: usize,
    /// Description on the "ours" banner
    pub ours: String,
    /// Description on the "theirs" banner
    pub theirs: String,
    pub has_base: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub base: Option<String>,
    /// Which side sits above the separator
    pub top: Source,
}

/// Result of scanning one file for conflict markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub conflicts: Vec<ConflictSummary>,
    /// Error message if the file could not be scanned.
    /// When set, `conflicts` is empty and should not be trusted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub error: Option<String>,
}

impl FileReport {
    /// Summarize `conflicts`, which were scanned from `buffer`
    pub fn from_conflicts(
        path: impl Into<PathBuf>,
        buffer: &TextBuffer,
        conflicts: &[Conflict],
    ) -> Result<Self> {
        let path = path.into();
        let conflicts = conflicts
            .iter()
            .map(|conflict| ConflictSummary::from_conflict(buffer, conflict))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RepositoryError::conflict(&path, e))?;

        Ok(Self {
            path,
            conflicts,
            error: None,
        })
    }

    fn failed(path: impl Into<PathBuf>, error: &RepositoryError) -> Self {
        Self {
            path: path.into(),
            conflicts: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn count(&self) -> usize {
        self.conflicts.len()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

impl ConflictSummary {
    fn from_conflict(
        buffer: &TextBuffer,
        conflict: &Conflict,
    ) -> crate::conflict::ConflictResult<Self> {
        let range = conflict.range(buffer)?;
        let (start_line, end_line) = line_span(range);
        let top = conflict
            .sides()
            .next()
            .map_or(Source::Ours, |side| side.source());

        Ok(Self {
            start_line,
            end_line,
            ours: conflict.ours().description().to_string(),
            theirs: conflict.theirs().description().to_string(),
            has_base: conflict.base().is_some(),
            base: conflict.base().map(|base| base.description().to_string()),
            top,
        })
    }
}

// ============================================================================
// ConflictedFile scanning methods
// ============================================================================

impl ConflictedFile {
    /// Read the file from disk and summarize its conflict markers
    pub fn scan(&self, is_rebase: bool) -> Result<FileReport> {
        let mut buffer = read_buffer(&self.absolute_path)?;
        let conflicts = scan_for_conflicts(&mut buffer, is_rebase)
            .map_err(|e| RepositoryError::conflict(&self.path, e))?;
        FileReport::from_conflicts(&self.path, &buffer, &conflicts)
    }
}

// ============================================================================
// MergeSession scanning methods
// ============================================================================

impl MergeSession {
    /// Scan every conflicted file. Failures are reported per file.
    pub fn scan_all(&self) -> Vec<FileReport> {
        let is_rebase = self.is_rebase();
        self.files()
            .iter()
            .map(|file| {
                file.scan(is_rebase)
                    .unwrap_or_else(|e| FileReport::failed(&file.path, &e))
            })
            .collect()
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Load a working tree file into a fresh buffer
pub fn read_buffer(path: &Path) -> Result<TextBuffer> {
    let text = std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))?;
    Ok(TextBuffer::new(text))
}

/// Write the buffer's text back to `path`
pub fn write_buffer(path: &Path, buffer: &TextBuffer) -> Result<()> {
    std::fs::write(path, buffer.text()).map_err(|e| RepositoryError::io(path, e))
}

/// First and last 1-based line touched by `range`
fn line_span(range: Range) -> (usize, usize) {
    let end_line = if range.end.column == 0 && range.end.row > range.start.row {
        range.end.row
    } else {
        range.end.row + 1
    };
    (range.start.row + 1, end_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DIFF3: &str = "\
fn main() {
<<<<<<< HEAD
    println!(\"ours\");
||||||| merged common ancestors
    println!(\"base\");
=======
    println!(\"theirs\");
>>>>>>> feature
}
";

    fn conflicted_file(dir: &TempDir, name: &str, text: &str) -> ConflictedFile {
        let absolute_path = dir.path().join(name);
        std::fs::write(&absolute_path, text).unwrap();
        ConflictedFile {
            path: PathBuf::from(name),
            absolute_path,
        }
    }

    #[test]
    fn scan_summarizes_each_conflict() {
        let dir = TempDir::new().unwrap();
        let file = conflicted_file(&dir, "main.rs", DIFF3);

        let report = file.scan(false).unwrap();
        assert_eq!(report.path, PathBuf::from("main.rs"));
        assert_eq!(report.count(), 1);
        assert_eq!(
            report.conflicts[0],
            ConflictSummary {
                start_line: 2,
                end_line: 8,
                ours: "HEAD".to_string(),
                theirs: "feature".to_string(),
                has_base: true,
                base: Some("merged common ancestors".to_string()),
                top: Source::Ours,
            }
        );
    }

    #[test]
    fn rebase_scan_puts_theirs_on_top() {
        let dir = TempDir::new().unwrap();
        let file = conflicted_file(&dir, "main.rs", DIFF3);

        let report = file.scan(true).unwrap();
        let summary = &report.conflicts[0];
        assert_eq!(summary.top, Source::Theirs);
        assert_eq!(summary.theirs, "HEAD");
        assert_eq!(summary.ours, "feature");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let file = ConflictedFile {
            path: PathBuf::from("gone.txt"),
            absolute_path: dir.path().join("gone.txt"),
        };
        assert!(matches!(file.scan(false), Err(RepositoryError::Io { .. })));
    }

    #[test]
    fn last_line_without_newline_is_counted() {
        let range = Range::new((3, 0), (7, 15));
        assert_eq!(line_span(range), (4, 8));
        assert_eq!(line_span(Range::rows(3, 8)), (4, 8));
    }

    #[test]
    fn report_serializes_without_empty_fields() {
        let dir = TempDir::new().unwrap();
        let file = conflicted_file(&dir, "a.txt", "<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> x\n");
        let report = file.scan(false).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("error").is_none());
        assert!(json["conflicts"][0].get("base").is_none());
        assert_eq!(json["conflicts"][0]["top"], "ours");
    }
}
