use mergeline::repository::read_buffer;
use mergeline::{FileReport, MergeSession, MergeState, RepositoryError, scan_for_conflicts};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct CheckOutput {
    #[serde(flatten)]
    report: FileReport,
    state: MergeState,
    /// Whether git lists the file as unmerged; absent outside a repository
    #[serde(skip_serializing_if = "Option::is_none")]
    unmerged: Option<bool>,
}

/// Run the check command - reports the conflict markers in a single file.
///
/// Returns true if conflicts were found (caller should exit with code 2).
pub fn run_check(path: &str, rebase: bool) -> Result<bool, RepositoryError> {
    let file_path = PathBuf::from(path);
    let session = session_for(&file_path);
    let is_rebase = rebase || session.as_ref().is_some_and(MergeSession::is_rebase);

    let mut buffer = read_buffer(&file_path)?;
    let conflicts = scan_for_conflicts(&mut buffer, is_rebase)
        .map_err(|e| RepositoryError::conflict(&file_path, e))?;
    let report = FileReport::from_conflicts(&file_path, &buffer, &conflicts)?;
    let is_conflicted = report.has_conflicts();

    let unmerged = session.as_ref().map(|session| {
        file_path
            .canonicalize()
            .is_ok_and(|absolute| session.find(absolute).is_some())
    });

    let output = CheckOutput {
        report,
        state: session
            .as_ref()
            .map_or(MergeState::Clean, MergeSession::state),
        unmerged,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }

    Ok(is_conflicted)
}

/// The merge session around `file`, if it lives in a repository
pub(crate) fn session_for(file: &Path) -> Option<MergeSession> {
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    MergeSession::discover_from(dir).ok()
}
