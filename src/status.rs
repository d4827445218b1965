use colored::Colorize;
use mergeline::{FileReport, MergeSession, MergeState, Source};
use serde::Serialize;

/// JSON output structure for status command
#[derive(Debug, Serialize)]
struct StatusOutput {
    workdir: String,
    branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    revision: Option<String>,
    state: MergeState,
    files: Vec<FileReport>,
}

/// Handles the display of status information for a merge session
pub struct StatusDisplay<'a> {
    session: &'a MergeSession,
}

impl<'a> StatusDisplay<'a> {
    /// Create a new StatusDisplay for the given session
    pub fn new(session: &'a MergeSession) -> Self {
        Self { session }
    }

    /// Run the full status display (repository + files + summary)
    pub fn show(&self) {
        self.show_repository();
        if self.session.is_empty() {
            println!(
                "\n{} {}",
                "✓".bright_green().bold(),
                "No unmerged files".green()
            );
            return;
        }

        let reports = self.session.scan_all();
        self.show_files(&reports);
        self.display_summary(&reports);
    }

    /// Display where we are and what is in progress
    pub fn show_repository(&self) {
        println!("{}", "Repository:".bright_cyan().bold());
        let state_colored = match self.session.state() {
            MergeState::Clean => "clean".green(),
            MergeState::Merging => "merging".yellow().bold(),
            MergeState::Rebasing => "rebasing".bright_red().bold(),
            MergeState::CherryPicking => "cherry-picking".bright_yellow(),
            MergeState::Reverting => "reverting".bright_yellow(),
        };
        let revision = self
            .session
            .revision()
            .map(|rev| rev.chars().take(8).collect::<String>())
            .unwrap_or_else(|| "unborn".to_string());
        println!(
            "  {} [{} @ {}] ({})",
            self.session.workdir().display().to_string().white(),
            self.session.branch().bright_magenta(),
            revision.bright_black(),
            state_colored
        );
        if self.session.is_rebase() {
            println!(
                "  {}",
                "ours = upstream being rebased onto, theirs = commit being replayed".bright_black()
            );
        }
    }

    /// Display each conflicted file and its conflicts
    fn show_files(&self, reports: &[FileReport]) {
        println!("\n{}", "Unmerged files:".bright_cyan().bold());

        for report in reports {
            print!("  {}: ", report.path.display().to_string().yellow());

            if let Some(error) = &report.error {
                println!("{} {}", "Error scanning:".red(), error);
                continue;
            }
            if !report.has_conflicts() {
                println!(
                    "{} {}",
                    "✓".bright_green().bold(),
                    "No markers left (ready to stage)".green()
                );
                continue;
            }

            let warn_text = format!(
                "⚠ {} conflict{}",
                report.count(),
                if report.count() == 1 { "" } else { "s" }
            );
            if report.count() == 1 {
                println!("{}", warn_text.bright_yellow().bold());
            } else {
                println!("{}", warn_text.bright_red().bold());
            }

            for summary in &report.conflicts {
                let (top, bottom) = match summary.top {
                    Source::Theirs => (&summary.theirs, &summary.ours),
                    _ => (&summary.ours, &summary.theirs),
                };
                let base = summary
                    .base
                    .as_ref()
                    .map(|base| format!(" (base: {})", base))
                    .unwrap_or_default();
                println!(
                    "    {} lines {}-{}: {} {} {}{}",
                    "→".bright_red(),
                    summary.start_line,
                    summary.end_line,
                    top.bright_magenta(),
                    "vs".white(),
                    bottom.bright_magenta(),
                    base.bright_black()
                );
            }
        }
    }

    /// Display summary statistics
    fn display_summary(&self, reports: &[FileReport]) {
        let error_count = reports.iter().filter(|r| r.error.is_some()).count();
        let checked = reports.len() - error_count;
        let total_conflicts: usize = reports.iter().map(FileReport::count).sum();

        print!("\n{}: ", "Summary".bright_cyan().bold());
        print!(
            "Scanned {} file{}, ",
            checked.to_string().bright_blue().bold(),
            if checked == 1 { "" } else { "s" }
        );

        if total_conflicts == 0 {
            println!("found {} conflicts ✅", "no".bright_green().bold());
        } else {
            let conflict_color = if total_conflicts == 1 {
                total_conflicts.to_string().bright_yellow().bold()
            } else {
                total_conflicts.to_string().bright_red().bold()
            };
            println!(
                "found {} total conflict{}",
                conflict_color,
                if total_conflicts == 1 { "" } else { "s" }
            );
        }

        if error_count > 0 {
            println!(
                "  {} {} failed to scan",
                error_count.to_string().bright_red().bold(),
                if error_count == 1 { "file" } else { "files" }
            );
        }
    }
}

/// Run the status command - displays the session and every conflicted file
pub fn run_status(session: &MergeSession, json: bool) {
    if json {
        let output = StatusOutput {
            workdir: session.workdir().display().to_string(),
            branch: session.branch().to_string(),
            revision: session.revision().map(str::to_string),
            state: session.state(),
            files: session.scan_all(),
        };

        match serde_json::to_string_pretty(&output) {
            Ok(json_str) => println!("{}", json_str),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
    } else {
        // Human-readable output
        let display = StatusDisplay::new(session);
        display.show();
    }
}
