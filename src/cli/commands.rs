//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - review: walk the stale queue interactively (default)
//! - list: print the stale queue without prompting

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stale-triage - find tasks whose priority has gone stale and re-triage them
#[derive(Parser, Debug)]
#[command(name = "stale-triage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Board to audit (overrides config)
    #[arg(long, global = true)]
    pub board: Option<String>,

    /// Column to audit, repeatable (overrides config)
    #[arg(long = "column", global = true)]
    pub columns: Vec<String>,

    /// Print edits instead of submitting them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Review stale tasks one by one and set new priorities
    Review,

    /// List stale tasks without prompting or editing
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["stale-triage"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.dry_run);
        assert!(cli.columns.is_empty());
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::try_parse_from(["stale-triage", "list"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List));
    }

    #[test]
    fn test_cli_parse_review_flags() {
        let cli = Cli::try_parse_from([
            "stale-triage",
            "review",
            "--dry-run",
            "--board",
            "PHID-PROJ-b",
            "--column",
            "PHID-PCOL-1",
            "--column",
            "PHID-PCOL-2",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::Review));
        assert!(cli.dry_run);
        assert_eq!(cli.board.as_deref(), Some("PHID-PROJ-b"));
        assert_eq!(cli.columns, vec!["PHID-PCOL-1", "PHID-PCOL-2"]);
    }

    #[test]
    fn test_cli_parse_config() {
        let cli = Cli::try_parse_from(["stale-triage", "-c", "/tmp/triage.yml", "-v"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/triage.yml")));
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_invalid_subcommand() {
        assert!(Cli::try_parse_from(["stale-triage", "frobnicate"]).is_err());
    }
}
