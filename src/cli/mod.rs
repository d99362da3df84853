//! CLI module for stale-triage - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
