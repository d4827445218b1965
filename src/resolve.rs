use crate::check::session_for;
use clap::ValueEnum;
use colored::Colorize;
use mergeline::repository::{read_buffer, write_buffer};
use mergeline::{
    Point, RepositoryError, Source, match_cursors_to_conflicts, resolve_as_sequence,
    scan_for_conflicts,
};
use std::path::PathBuf;
use tracing::info;

/// What to keep from each conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Keep {
    Ours,
    Theirs,
    Base,
    OursThenTheirs,
    TheirsThenOurs,
    /// The side (or sides) under the --at cursors
    Current,
}

impl Keep {
    fn sources(self) -> &'static [Source] {
        match self {
            Keep::Ours => &[Source::Ours],
            Keep::Theirs => &[Source::Theirs],
            Keep::Base => &[Source::Base],
            Keep::OursThenTheirs => &[Source::Ours, Source::Theirs],
            Keep::TheirsThenOurs => &[Source::Theirs, Source::Ours],
            Keep::Current => &[],
        }
    }
}

/// Parse a 1-based `LINE` or `LINE:COLUMN` into a buffer point
pub fn parse_cursor(value: &str) -> Result<Point, String> {
    let (line, column) = match value.split_once(':') {
        Some((line, column)) => (line, Some(column)),
        None => (value, None),
    };
    let one_based = |part: &str| match part.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("'{}' is not a positive number", part)),
    };

    let row = one_based(line)?;
    let column = column.map(one_based).transpose()?.unwrap_or(0);
    Ok(Point::new(row, column))
}

/// Run the resolve command - resolves conflicts in `path` and writes it back
pub fn run_resolve(
    path: &str,
    keep: Keep,
    mut cursors: Vec<Point>,
    rebase: bool,
) -> Result<(), RepositoryError> {
    let file_path = PathBuf::from(path);
    let is_rebase = rebase || session_for(&file_path).is_some_and(|s| s.is_rebase());

    let mut buffer = read_buffer(&file_path)?;
    let mut conflicts = scan_for_conflicts(&mut buffer, is_rebase)
        .map_err(|e| RepositoryError::conflict(&file_path, e))?;
    let total = conflicts.len();

    // (conflict index, sides to keep in order)
    let plan: Vec<(usize, Vec<Source>)> = if cursors.is_empty() {
        (0..total).map(|i| (i, keep.sources().to_vec())).collect()
    } else {
        cursors.sort();
        let matches = match_cursors_to_conflicts(&buffer, &cursors, &conflicts)
            .map_err(|e| RepositoryError::conflict(&file_path, e))?;
        matches
            .iter()
            .filter_map(|m| {
                let index = conflicts.iter().position(|c| std::ptr::eq(c, m.conflict))?;
                let sources = match keep {
                    Keep::Current => m.sides.iter().map(|side| side.source()).collect(),
                    _ => keep.sources().to_vec(),
                };
                Some((index, sources))
            })
            .collect()
    };

    for (index, sources) in &plan {
        resolve_as_sequence(&mut buffer, &mut conflicts[*index], sources)
            .map_err(|e| RepositoryError::conflict(&file_path, e))?;
    }

    if !plan.is_empty() {
        write_buffer(&file_path, &buffer)?;
    }
    info!(path = %file_path.display(), resolved = plan.len(), total, "Resolved conflicts");

    let remaining = total - plan.len();
    let resolved = format!(
        "Resolved {} of {} conflict{}",
        plan.len(),
        total,
        if total == 1 { "" } else { "s" }
    );
    if remaining == 0 {
        println!(
            "{} {} in {}",
            "✓".bright_green().bold(),
            resolved.green(),
            path.yellow()
        );
    } else {
        println!(
            "{} {} in {} ({} remaining)",
            "⚠".bright_yellow().bold(),
            resolved.bright_yellow(),
            path.yellow(),
            remaining.to_string().bright_red().bold()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursors_are_one_based() {
        assert_eq!(parse_cursor("12"), Ok(Point::new(11, 0)));
        assert_eq!(parse_cursor("3:5"), Ok(Point::new(2, 4)));
        assert!(parse_cursor("0").is_err());
        assert!(parse_cursor("x:1").is_err());
    }

    #[test]
    fn sequences_name_their_sides_in_order() {
        assert_eq!(
            Keep::TheirsThenOurs.sources(),
            &[Source::Theirs, Source::Ours]
        );
        assert!(Keep::Current.sources().is_empty());
    }
}
