use clap::{Parser, Subcommand};
use colored::control;
use mergeline::{MergeSession, Point};
use tracing_subscriber::EnvFilter;

mod check;
mod resolve;
mod status;
mod watch;

use resolve::Keep;

/// Environment variable holding the log filter, e.g. `mergeline=debug`
const LOG_ENV: &str = "MERGELINE_LOG";

#[derive(Parser)]
#[command(name = "mergeline")]
#[command(version)]
#[command(about = "Find and resolve git conflict markers in your working tree")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every conflicted file and its conflicts (supports --json)
    Status {
        #[arg(long, help = "Output results as JSON")]
        json: bool,
    },
    /// Watch conflict resolution progress in real-time with interactive TUI
    Watch {},
    /// Report the conflict markers in a single file (JSON output)
    Check {
        /// File path to check
        path: String,

        /// Read sides with rebase labels (detected from the repository by default)
        #[arg(long)]
        rebase: bool,
    },
    /// Resolve conflicts in a file and write it back
    Resolve {
        /// File path to resolve
        path: String,

        /// Which side, or sequence of sides, to keep
        #[arg(long, value_enum)]
        keep: Keep,

        /// Only resolve conflicts under these cursors (LINE or LINE:COLUMN, 1-based)
        #[arg(
            long = "at",
            value_name = "LINE[:COL]",
            value_parser = resolve::parse_cursor,
            required_if_eq("keep", "current")
        )]
        cursors: Vec<Point>,

        /// Read sides with rebase labels (detected from the repository by default)
        #[arg(long)]
        rebase: bool,
    },
}

fn main() {
    // Force colors to always be enabled
    control::set_override(true);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Status { json }) => match MergeSession::discover() {
            Ok(session) => {
                status::run_status(&session, json);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Watch {}) => match MergeSession::discover() {
            Ok(session) => {
                if let Err(e) = watch::run_watch_mode(session) {
                    eprintln!("Error running watch mode: {}", e);
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Check { path, rebase }) => match check::run_check(&path, rebase) {
            Ok(true) => std::process::exit(2),
            Ok(false) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Resolve {
            path,
            keep,
            cursors,
            rebase,
        }) => {
            if let Err(e) = resolve::run_resolve(&path, keep, cursors, rebase) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Mergeline v{}", env!("CARGO_PKG_VERSION"));
            println!("Try 'mergeline --help' for more information.");
        }
    }
}
