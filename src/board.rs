//! Board snapshot: the one-shot read phase before any review starts.
//!
//! Reads are all-or-nothing. Any failed fetch or a task/history mismatch
//! aborts before anything is shown or edited.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::audit::{Selection, Selector, StalenessPolicy, TaskHistory, correlate};
use crate::error::Result;
use crate::tracker::Tracker;

/// Everything fetched from the tracker for one run.
#[derive(Debug, Default)]
pub struct BoardSnapshot {
    pub histories: Vec<TaskHistory>,
    /// `column id -> name`
    pub columns: HashMap<String, String>,
}

/// Fetch open tasks, their histories (one batched call) and column names.
pub async fn fetch_board(tracker: &dyn Tracker, board_id: &str) -> Result<BoardSnapshot> {
    let tasks = tracker.fetch_open_tasks(board_id).await?;
    let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
    let transactions = tracker.fetch_transactions(&ids).await?;
    let columns = tracker.fetch_columns(board_id).await?;

    let histories = correlate(tasks, transactions)?;
    log::info!("Board {}: {} open tasks, {} columns", board_id, histories.len(), columns.len());

    Ok(BoardSnapshot { histories, columns })
}

/// Fetch the board and build the ranked review queue as of `now`.
pub async fn audit_board(
    tracker: &dyn Tracker,
    board_id: &str,
    tracked_columns: HashSet<String>,
    policy: StalenessPolicy,
    now: DateTime<Utc>,
) -> Result<Selection> {
    let snapshot = fetch_board(tracker, board_id).await?;
    let selector = Selector::new(board_id, tracked_columns, now)
        .with_column_names(snapshot.columns)
        .with_policy(policy);
    Ok(selector.select(&snapshot.histories))
}
