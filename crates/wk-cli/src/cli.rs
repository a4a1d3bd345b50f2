//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Project time tracker.
///
/// Clock in and out of projects, mark reported time as registered, and review
/// tracked time grouped by day or week.
#[derive(Debug, Parser)]
#[command(name = "wk", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage projects.
    #[command(subcommand)]
    Project(ProjectAction),

    /// Start or stop tracking time.
    #[command(subcommand)]
    Clock(ClockAction),

    /// Toggle the registered state of time intervals.
    Register {
        /// Project the intervals belong to.
        project: String,

        /// Interval ids, as shown by `wk report`.
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Delete time intervals.
    RemoveTime {
        /// Interval ids, as shown by `wk report`.
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show clocked-in projects.
    Status,

    /// Show tracked time for a project, most recent first.
    Report {
        /// Project name.
        project: String,

        /// Group by day instead of by week.
        #[arg(long)]
        days: bool,

        /// Number of days or weeks to skip.
        #[arg(long, default_value_t = 0)]
        position: usize,

        /// Maximum number of days or weeks to show.
        #[arg(long, default_value_t = 10)]
        size: usize,

        /// Leave out registered time.
        #[arg(long)]
        not_registered: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Project subcommands.
#[derive(Debug, Subcommand)]
pub enum ProjectAction {
    /// Create a project.
    Add {
        /// Project name, unique ignoring case.
        name: String,
    },

    /// List projects by name.
    List {
        #[arg(long, default_value_t = 0)]
        position: usize,

        #[arg(long, default_value_t = 50)]
        size: usize,
    },

    /// Remove a project and all of its time.
    Remove {
        /// Project name.
        name: String,
    },
}

/// Clock subcommands.
#[derive(Debug, Subcommand)]
pub enum ClockAction {
    /// Start tracking time for a project.
    In {
        /// Project name.
        project: String,

        /// When to clock in (e.g. "09:15", "2026-01-15 09:15", "15 minutes ago").
        #[arg(long)]
        at: Option<String>,
    },

    /// Stop tracking time for a project.
    Out {
        /// Project name.
        project: String,

        /// When to clock out (e.g. "17:30", "2026-01-15 17:30", "5 minutes ago").
        #[arg(long)]
        at: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_report_options() {
        let cli = Cli::try_parse_from([
            "wk",
            "report",
            "android",
            "--days",
            "--position",
            "2",
            "--not-registered",
        ])
        .unwrap();

        let Some(Commands::Report {
            project,
            days,
            position,
            size,
            not_registered,
            json,
        }) = cli.command
        else {
            panic!("expected report command");
        };
        assert_eq!(project, "android");
        assert!(days);
        assert_eq!(position, 2);
        assert_eq!(size, 10);
        assert!(not_registered);
        assert!(!json);
    }

    #[test]
    fn test_parses_clock_in_with_time() {
        let cli = Cli::try_parse_from(["wk", "clock", "in", "android", "--at", "09:15"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Clock(ClockAction::In { ref project, at: Some(ref at) }))
                if project == "android" && at == "09:15"
        ));
    }

    #[test]
    fn test_register_requires_ids() {
        assert!(Cli::try_parse_from(["wk", "register", "android"]).is_err());
    }
}
