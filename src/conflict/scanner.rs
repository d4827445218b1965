//! Whole-buffer search for top-level conflicts

use super::Conflict;
use super::error::{ConflictError, Result};
use super::parser::parse_conflict;
use super::visitor::CollectingVisitor;
use crate::buffer::{LineAdapter, TextBuffer};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Beginning of a potential conflict
static CONFLICT_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^<{7} (.+)\r?\n").expect("conflict start pattern is valid"));

/// Parse every conflict in `buffer`, top to bottom.
///
/// Candidates that turn out to be unterminated are skipped and scanning resumes
/// on the following line. Any other parse failure is returned, and the markers
/// of conflicts found before it are destroyed.
///
/// The caller owns the returned conflicts and must [`Conflict::release`] them
/// once they are no longer tracked.
pub fn scan_for_conflicts(buffer: &mut TextBuffer, is_rebase: bool) -> Result<Vec<Conflict>> {
    let mut conflicts = Vec::new();
    match collect_conflicts(buffer, is_rebase, &mut conflicts) {
        Ok(()) => {
            debug!(count = conflicts.len(), is_rebase, "Scanned buffer for conflicts");
            Ok(conflicts)
        }
        Err(error) => {
            for conflict in conflicts {
                conflict.release(buffer);
            }
            Err(error)
        }
    }
}

fn collect_conflicts(
    buffer: &mut TextBuffer,
    is_rebase: bool,
    conflicts: &mut Vec<Conflict>,
) -> Result<()> {
    let mut consumed_through = 0;

    for start_row in buffer.scan_rows(&CONFLICT_START) {
        if start_row < consumed_through {
            // Inside a conflict that was already parsed
            continue;
        }

        let mut visitor = CollectingVisitor::new(start_row);
        let mut adapter = buffer.adapter(start_row);
        match parse_conflict(&mut adapter, is_rebase, &mut visitor) {
            Ok(()) => {
                consumed_through = adapter.current_row();
                conflicts.push(visitor.finish(buffer)?);
            }
            Err(error @ ConflictError::UnterminatedConflict { .. }) => {
                warn!(row = start_row, %error, "Unable to parse conflict");
            }
            Err(error) => return Err(error),
        }
    }

    Ok(())
}
