//! Per-path counts of conflicts found and conflicts resolved

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolution state of one path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathProgress {
    pub resolved: usize,
    pub max: usize,
}

/// Serializable snapshot of a [`ResolutionProgress`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPayload {
    pub revision: String,
    pub paths: BTreeMap<String, PathProgress>,
}

/// Tracks how far conflict resolution has come for each path, keyed to the
/// revision being merged so stale counts are never restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionProgress {
    revision: String,
    paths: BTreeMap<String, PathProgress>,
}

impl ResolutionProgress {
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            paths: BTreeMap::new(),
        }
    }

    /// Restore `payload` if it was recorded at `revision`; otherwise start empty
    pub fn from_payload(revision: impl Into<String>, payload: ProgressPayload) -> Self {
        let revision = revision.into();
        if payload.revision == revision {
            Self {
                revision,
                paths: payload.paths,
            }
        } else {
            Self::new(revision)
        }
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Record how many conflicts `path` started with. Only the first report
    /// for a path counts; later scans see fewer markers as they get resolved.
    pub fn report_marker_count(&mut self, path: &str, count: usize) {
        self.paths
            .entry(path.to_string())
            .or_insert(PathProgress {
                resolved: 0,
                max: count,
            });
    }

    /// Count one more resolved conflict in `path`, never beyond its maximum
    pub fn marker_was_resolved(&mut self, path: &str) {
        if let Some(entry) = self.paths.get_mut(path) {
            entry.resolved = (entry.resolved + 1).min(entry.max);
        }
    }

    /// Resolved conflicts in `path` (0 if it never reported)
    pub fn value(&self, path: &str) -> usize {
        self.paths.get(path).map_or(0, |p| p.resolved)
    }

    /// Total conflicts in `path`; always positive so it can divide
    pub fn max(&self, path: &str) -> usize {
        self.paths.get(path).map_or(1, |p| p.max.max(1))
    }

    /// Fraction of `path` resolved, between 0.0 and 1.0
    pub fn ratio(&self, path: &str) -> f64 {
        self.value(path) as f64 / self.max(path) as f64
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn payload(&self) -> ProgressPayload {
        ProgressPayload {
            revision: self.revision.clone(),
            paths: self.paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "path/to/file.txt";

    #[test]
    fn unreported_path_has_no_progress() {
        let progress = ResolutionProgress::new("1234abcd");
        assert_eq!(progress.value(FILE), 0);
        assert!(progress.max(FILE) > 0);
        assert!(progress.is_empty());
    }

    #[test]
    fn marker_count_sets_the_max() {
        let mut progress = ResolutionProgress::new("1234abcd");
        progress.report_marker_count(FILE, 3);
        assert_eq!(progress.value(FILE), 0);
        assert_eq!(progress.max(FILE), 3);

        progress.marker_was_resolved(FILE);
        assert_eq!(progress.value(FILE), 1);
        assert_eq!(progress.max(FILE), 3);
    }

    #[test]
    fn later_marker_counts_are_ignored() {
        let mut progress = ResolutionProgress::new("1234abcd");
        progress.report_marker_count(FILE, 3);
        progress.report_marker_count(FILE, 10);
        assert_eq!(progress.max(FILE), 3);
    }

    #[test]
    fn resolutions_are_capped_at_the_max() {
        let mut progress = ResolutionProgress::new("1234abcd");
        progress.report_marker_count(FILE, 2);
        for _ in 0..3 {
            progress.marker_was_resolved(FILE);
        }
        assert_eq!(progress.value(FILE), 2);
        assert_eq!(progress.ratio(FILE), 1.0);
    }

    fn recorded_payload() -> ProgressPayload {
        let mut progress = ResolutionProgress::new("1234abcd");
        progress.report_marker_count("path/to/file0.txt", 3);
        progress.marker_was_resolved("path/to/file0.txt");
        progress.marker_was_resolved("path/to/file0.txt");
        progress.report_marker_count("path/to/file1.txt", 4);
        progress.marker_was_resolved("path/to/file1.txt");
        progress.payload()
    }

    #[test]
    fn payload_restores_for_the_same_revision() {
        let json = serde_json::to_string(&recorded_payload()).unwrap();
        let payload: ProgressPayload = serde_json::from_str(&json).unwrap();

        let progress = ResolutionProgress::from_payload("1234abcd", payload);
        assert_eq!(progress.max("path/to/file0.txt"), 3);
        assert_eq!(progress.value("path/to/file0.txt"), 2);
        assert_eq!(progress.max("path/to/file1.txt"), 4);
        assert_eq!(progress.value("path/to/file1.txt"), 1);
        assert!(!progress.is_empty());
    }

    #[test]
    fn payload_from_another_revision_is_dropped() {
        let progress = ResolutionProgress::from_payload("abcd1234", recorded_payload());
        assert_eq!(progress.value("path/to/file0.txt"), 0);
        assert_eq!(progress.value("path/to/file1.txt"), 0);
        assert!(progress.is_empty());
        assert_eq!(progress.revision(), "abcd1234");
    }
}
