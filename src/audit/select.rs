//! Task selection and ranking.
//!
//! Turns the fetched board into an ordered review queue:
//! - join tasks to their histories by task id
//! - keep tasks placed in a tracked column
//! - keep tasks whose priority is stale
//! - rank by priority, highest first
//!
//! The queue is fully materialized before any review starts, so the operator
//! sees a fixed count and order even if the board changes underneath.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};

use crate::audit::column::resolve_column;
use crate::audit::extract::extract_priority;
use crate::audit::staleness::{StaleReason, StalenessPolicy};
use crate::domain::{Priority, Task, Transaction};
use crate::error::{Result, TriageError};

/// A task paired with its full history.
pub type TaskHistory = (Task, Vec<Transaction>);

/// One entry of the review queue.
#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub task: Task,
    pub column_id: String,
    pub column_name: String,
    pub priority: Priority,
    pub elapsed: TimeDelta,
    pub reason: StaleReason,
}

/// Result of a selection pass.
#[derive(Debug, Default)]
pub struct Selection {
    /// Stale tasks, highest priority first.
    pub queue: Vec<ReviewItem>,
    /// Tasks dropped because their history could not be read.
    pub invalid: Vec<TriageError>,
    /// Tasks considered after the join.
    pub considered: usize,
}

/// Join tasks to their histories by task id.
///
/// Both sides must cover exactly the same ids; any disagreement is a
/// `CorrelationMismatch` and nothing is returned.
pub fn correlate(tasks: Vec<Task>, mut histories: HashMap<u64, Vec<Transaction>>) -> Result<Vec<TaskHistory>> {
    let task_ids: HashSet<u64> = tasks.iter().map(|t| t.id).collect();

    let mut missing: Vec<u64> = task_ids.iter().copied().filter(|id| !histories.contains_key(id)).collect();
    let mut unexpected: Vec<u64> = histories.keys().copied().filter(|id| !task_ids.contains(id)).collect();

    if task_ids.len() != tasks.len() {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id) {
                unexpected.push(task.id);
            }
        }
    }

    if !missing.is_empty() || !unexpected.is_empty() {
        missing.sort_unstable();
        unexpected.sort_unstable();
        unexpected.dedup();
        return Err(TriageError::CorrelationMismatch { missing, unexpected });
    }

    Ok(tasks
        .into_iter()
        .map(|task| {
            let history = histories.remove(&task.id).unwrap_or_default();
            (task, history)
        })
        .collect())
}

/// Sort review items by priority, highest first. Stable for equal priorities.
pub fn rank(items: &mut [ReviewItem]) {
    items.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Selects stale tasks in tracked columns as of a fixed `now`.
pub struct Selector {
    board_id: String,
    tracked_columns: HashSet<String>,
    column_names: HashMap<String, String>,
    policy: StalenessPolicy,
    now: DateTime<Utc>,
}

impl Selector {
    /// Create a selector for `board_id` using the default policy.
    pub fn new(board_id: impl Into<String>, tracked_columns: HashSet<String>, now: DateTime<Utc>) -> Self {
        Self {
            board_id: board_id.into(),
            tracked_columns,
            column_names: HashMap::new(),
            policy: StalenessPolicy::default(),
            now,
        }
    }

    /// Use display names for columns (`column id -> name`).
    pub fn with_column_names(mut self, names: HashMap<String, String>) -> Self {
        self.column_names = names;
        self
    }

    /// Use a custom staleness policy.
    pub fn with_policy(mut self, policy: StalenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The wall-clock snapshot all ages are measured against.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Evaluate a single task. `Ok(None)` means it is not up for review.
    pub fn evaluate(&self, task: &Task, history: &[Transaction]) -> Result<Option<ReviewItem>> {
        let Some(column_id) = resolve_column(history, &self.board_id) else {
            log::debug!("{}: no column on board, skipping", task.monogram());
            return Ok(None);
        };
        if !self.tracked_columns.contains(column_id) {
            log::debug!("{}: column {} not tracked, skipping", task.monogram(), column_id);
            return Ok(None);
        }

        let age = extract_priority(task.id, history, self.now)?;
        let Some(reason) = self.policy.classify(age.priority, age.elapsed) else {
            log::debug!(
                "{}: {} for {} days, not stale",
                task.monogram(),
                age.priority,
                age.elapsed.num_days()
            );
            return Ok(None);
        };

        log::debug!("{}: flagged, {}", task.monogram(), reason);
        let column_name = self
            .column_names
            .get(column_id)
            .cloned()
            .unwrap_or_else(|| column_id.to_string());

        Ok(Some(ReviewItem {
            task: task.clone(),
            column_id: column_id.to_string(),
            column_name,
            priority: age.priority,
            elapsed: age.elapsed,
            reason,
        }))
    }

    /// Build the ranked review queue.
    ///
    /// Tasks with unreadable history are reported in `invalid` and left out;
    /// the rest of the board is still processed.
    pub fn select(&self, board: &[TaskHistory]) -> Selection {
        let mut selection = Selection {
            considered: board.len(),
            ..Default::default()
        };

        for (task, history) in board {
            match self.evaluate(task, history) {
                Ok(Some(item)) => selection.queue.push(item),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Dropping {}: {}", task.monogram(), e);
                    selection.invalid.push(e);
                }
            }
        }

        rank(&mut selection.queue);
        log::info!(
            "Selected {} of {} tasks for review ({} unreadable)",
            selection.queue.len(),
            selection.considered,
            selection.invalid.len()
        );
        selection
    }
}
