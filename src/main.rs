use chrono::Utc;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use stale_triage::audit::{ReviewItem, Selection};
use stale_triage::board::audit_board;
use stale_triage::review::{ReviewSummary, TerminalOperator, review};
use stale_triage::tracker::ConduitClient;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stale-triage")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("stale-triage.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }
    if cli.dry_run {
        println!("{}", "Dry run: no edits will be submitted".yellow());
    }

    config.validate().context("Invalid configuration")?;
    let client = ConduitClient::new(config.conduit()?)?;

    // Single snapshot so every age in this run is measured from the same instant
    let now = Utc::now();
    println!("{} {}", "Auditing board".cyan(), config.board.id);
    let selection = audit_board(
        &client,
        &config.board.id,
        config.tracked_columns(),
        config.staleness_policy()?,
        now,
    )
    .await
    .context("Failed to read board")?;

    report_selection(&selection, cli.is_verbose());

    match cli.command.unwrap_or(Commands::Review) {
        Commands::List => {
            print_queue(&selection.queue);
            Ok(())
        }
        Commands::Review => {
            if selection.queue.is_empty() {
                return Ok(());
            }
            let mut operator = TerminalOperator::new();
            let summary = review(&client, &mut operator, &selection.queue, cli.dry_run).await?;
            print_summary(&summary);
            Ok(())
        }
    }
}

fn report_selection(selection: &Selection, verbose: bool) {
    for err in &selection.invalid {
        println!("{} {}", "Skipped:".red(), err);
    }
    if selection.queue.is_empty() {
        println!("{}", "Nothing stale. All tracked tasks are up to date.".green());
        return;
    }
    println!(
        "{} {} of {} open tasks need review",
        "Found:".green(),
        selection.queue.len(),
        selection.considered
    );
    if verbose {
        for item in &selection.queue {
            info!("Queued {} at {}", item.task.monogram(), item.priority);
        }
    }
}

fn print_queue(queue: &[ReviewItem]) {
    let total = queue.len();
    for (index, item) in queue.iter().enumerate() {
        println!(
            "{} {} {} {}",
            format!("[{}/{}]", index + 1, total).dimmed(),
            format!("{:<12}", item.priority.name()).bold(),
            item.task.monogram().cyan(),
            item.task.title
        );
        println!("      {} | {}", item.column_name, item.reason.to_string().yellow());
        println!("      {}", item.task.uri.dimmed());
    }
}

fn print_summary(summary: &ReviewSummary) {
    println!();
    println!(
        "{} reviewed {}, changed {}, unchanged {}, skipped {}, failed {}",
        "Done:".green(),
        summary.reviewed,
        summary.changed,
        summary.unchanged,
        summary.skipped,
        summary.failed
    );
    if summary.exited_early {
        println!("{}", "Stopped before the end of the queue.".yellow());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration, then let flags override the board
    let config = config::load_config(cli.config.as_ref()).context("Failed to load configuration")?;
    let config = config::apply_overrides(config, cli.board.as_deref(), &cli.columns);

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
