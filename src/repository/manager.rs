//! MergeSession - the conflicted state of one repository

use super::error::{RepositoryError, Result};
use super::{ConflictedFile, DETACHED_HEAD_LABEL, MergeState};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshot of an in-progress merge: where it happens, what started it, and
/// which files git still considers unmerged
#[derive(Debug, Clone)]
pub struct MergeSession {
    workdir: PathBuf,
    branch: String,
    revision: Option<String>,
    state: MergeState,
    files: Vec<ConflictedFile>,
    repo_path: PathBuf,
}

impl MergeSession {
    /// Discover the repository containing the current directory
    pub fn discover() -> Result<Self> {
        Self::discover_from(".")
    }

    /// Discover the repository containing `path`
    pub fn discover_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // Canonicalize path for better error messages
        let canonical_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let repo = gix::discover(path).map_err(|_| RepositoryError::NotARepository {
            path: canonical_path.clone(),
        })?;

        let workdir = repo
            .workdir()
            .and_then(|p| p.canonicalize().ok())
            .ok_or(RepositoryError::BareRepository)?;

        let branch = repo
            .head()
            .ok()
            .and_then(|head| head.referent_name().map(|n| n.shorten().to_string()))
            .unwrap_or_else(|| DETACHED_HEAD_LABEL.to_string());

        let revision = head_revision(&repo)?;
        let state = merge_state(&repo);
        let files = conflicted_paths(&repo)?
            .into_iter()
            .map(|path| ConflictedFile {
                absolute_path: workdir.join(&path),
                path,
            })
            .collect::<Vec<_>>();

        debug!(
            workdir = %workdir.display(),
            %state,
            conflicted = files.len(),
            "Discovered repository"
        );

        Ok(Self {
            workdir,
            branch,
            revision,
            state,
            files,
            repo_path: path.to_path_buf(),
        })
    }

    /// Refresh by re-discovering from the original path
    pub fn refresh(&mut self) -> Result<()> {
        *self = Self::discover_from(&self.repo_path)?;
        Ok(())
    }

    /// Root of the working directory
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Hex id of the commit HEAD points at, if there is one
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn state(&self) -> MergeState {
        self.state
    }

    /// Whether conflict sides should be read with rebase labels
    pub fn is_rebase(&self) -> bool {
        self.state.is_rebase()
    }

    /// Every file with unmerged index entries, in index order
    pub fn files(&self) -> &[ConflictedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Look up a conflicted file by workdir-relative or absolute path
    pub fn find(&self, path: impl AsRef<Path>) -> Option<&ConflictedFile> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|file| file.path == path || file.absolute_path == path)
    }
}

// MergeSession scanning methods live in scan.rs

// ============================================================================
// Helper functions (private to this module)
// ============================================================================

/// Commit id HEAD resolves to, or None on an unborn branch
fn head_revision(repo: &gix::Repository) -> Result<Option<String>> {
    let mut head = repo.head().map_err(|e| RepositoryError::HeadResolution {
        reason: e.to_string(),
    })?;

    let id = head
        .try_peel_to_id()
        .map_err(|e| RepositoryError::HeadResolution {
            reason: format!("Failed to peel HEAD: {}", e),
        })?;

    Ok(id.map(|id| id.to_string()))
}

fn merge_state(repo: &gix::Repository) -> MergeState {
    use gix::state::InProgress;

    match repo.state() {
        None => MergeState::Clean,
        Some(InProgress::Merge) => MergeState::Merging,
        Some(
            InProgress::Rebase | InProgress::RebaseInteractive | InProgress::ApplyMailboxRebase,
        ) => MergeState::Rebasing,
        Some(InProgress::CherryPick | InProgress::CherryPickSequence) => MergeState::CherryPicking,
        Some(InProgress::Revert | InProgress::RevertSequence) => MergeState::Reverting,
        // Bisecting or applying a mailbox without a rebase leaves no sides to pick
        Some(_) => MergeState::Clean,
    }
}

/// Paths with at least one entry in a non-zero stage, deduplicated
fn conflicted_paths(repo: &gix::Repository) -> Result<Vec<PathBuf>> {
    let index = repo
        .index_or_empty()
        .map_err(|e| RepositoryError::IndexRead {
            reason: e.to_string(),
        })?;

    let mut paths: Vec<PathBuf> = index
        .entries()
        .iter()
        .filter(|entry| entry.stage_raw() != 0)
        .map(|entry| gix::path::from_bstr(entry.path(&index)).into_owned())
        .collect();
    // Stages of one path are adjacent in the index
    paths.dedup();

    Ok(paths)
}
