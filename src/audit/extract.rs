//! Effective priority and its age, derived from a task's history.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{Priority, Transaction};
use crate::error::{Result, TriageError};

/// A task's effective priority and how long it has held it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAge {
    pub priority: Priority,
    /// When the priority was assigned (or the task's oldest activity when
    /// it never was).
    pub assigned_at: DateTime<Utc>,
    /// `now - assigned_at`
    pub elapsed: TimeDelta,
    /// True when no priority entry exists and the default was applied.
    pub defaulted: bool,
}

/// Derive the effective priority of a task as of `now`.
///
/// The most recently created priority entry wins regardless of history
/// order. Without one the task is treated as needs-triage since its oldest
/// recorded activity. An empty history has no baseline and is rejected.
pub fn extract_priority(task_id: u64, transactions: &[Transaction], now: DateTime<Utc>) -> Result<PriorityAge> {
    let mut newest_first: Vec<&Transaction> = transactions.iter().collect();
    // Stable: equal timestamps keep history order
    newest_first.sort_by(|a, b| b.date_created.cmp(&a.date_created));

    if let Some(tx) = newest_first.iter().find(|tx| tx.is_priority()) {
        let level = tx.priority_level().ok_or_else(|| TriageError::InvalidTaskState {
            task_id,
            reason: format!("unreadable priority value {}", tx.new_value),
        })?;
        let priority = Priority::from_level(level).ok_or_else(|| TriageError::InvalidTaskState {
            task_id,
            reason: format!("unknown priority level {}", level),
        })?;
        return Ok(PriorityAge {
            priority,
            assigned_at: tx.date_created,
            elapsed: now - tx.date_created,
            defaulted: false,
        });
    }

    let oldest = newest_first.last().ok_or_else(|| TriageError::InvalidTaskState {
        task_id,
        reason: "task has no transactions".to_string(),
    })?;

    Ok(PriorityAge {
        priority: Priority::NEEDS_TRIAGE,
        assigned_at: oldest.date_created,
        elapsed: now - oldest.date_created,
        defaulted: true,
    })
}
