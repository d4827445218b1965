//! Repository discovery for merges in progress
//!
//! This module finds the repository around a directory, works out which
//! operation (merge, rebase, cherry-pick, revert) left conflicts behind, and
//! lists the paths git still records as unmerged. Scanning a listed file for
//! its conflict markers lives in `scan.rs`.

mod error;
mod manager;
mod scan;

pub use error::{RepositoryError, Result as RepositoryResult};
pub use manager::MergeSession;
pub use scan::{ConflictSummary, FileReport, read_buffer, write_buffer};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Label for a HEAD that does not point at a branch
pub(crate) const DETACHED_HEAD_LABEL: &str = "(detached HEAD)";

/// A path with unmerged index entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictedFile {
    /// Path relative to the working directory, as git reports it
    pub path: PathBuf,

    /// Absolute filesystem path
    pub absolute_path: PathBuf,
}

// ConflictedFile methods are extended in scan.rs

/// Operation that is currently in progress in the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeState {
    /// Nothing in progress
    Clean,

    Merging,

    /// Commits are being replayed; conflict sides carry swapped labels
    Rebasing,

    CherryPicking,

    Reverting,
}

impl MergeState {
    /// Whether "ours" and "theirs" are inverted relative to marker position
    pub fn is_rebase(self) -> bool {
        self == MergeState::Rebasing
    }
}

impl std::fmt::Display for MergeState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MergeState::Clean => write!(f, "clean"),
            MergeState::Merging => write!(f, "merging"),
            MergeState::Rebasing => write!(f, "rebasing"),
            MergeState::CherryPicking => write!(f, "cherry-picking"),
            MergeState::Reverting => write!(f, "reverting"),
        }
    }
}
