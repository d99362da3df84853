//! Tracker trait and an in-memory implementation

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Task, Transaction};
use crate::error::{Result, TriageError};

/// The remote issue tracker, as seen by the audit.
///
/// Every call is potentially slow and failable; callers get no retries.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// All open tasks on the board.
    async fn fetch_open_tasks(&self, board_id: &str) -> Result<Vec<Task>>;

    /// Full histories for the given tasks, keyed by task id.
    async fn fetch_transactions(&self, task_ids: &[u64]) -> Result<HashMap<u64, Vec<Transaction>>>;

    /// Column display names for the board, keyed by column id.
    async fn fetch_columns(&self, board_id: &str) -> Result<HashMap<String, String>>;

    /// Set a task's priority by edit code.
    async fn submit_edit(&self, task: &Task, priority_code: &str) -> Result<()>;
}

/// A submitted edit, as recorded by [`MockTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedEdit {
    pub task_id: u64,
    pub code: String,
}

/// In-memory tracker for tests and dry runs.
#[derive(Debug, Default)]
pub struct MockTracker {
    tasks: Vec<Task>,
    transactions: HashMap<u64, Vec<Transaction>>,
    columns: HashMap<String, String>,
    fail_edits_for: HashSet<u64>,
    fail_reads: bool,
    edits: Mutex<Vec<SubmittedEdit>>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task and its history.
    pub fn with_task(mut self, task: Task, history: Vec<Transaction>) -> Self {
        self.transactions.insert(task.id, history);
        self.tasks.push(task);
        self
    }

    /// Add a task whose history the tracker "forgets" to return.
    pub fn with_orphan_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_column(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.columns.insert(id.into(), name.into());
        self
    }

    /// Make every edit to `task_id` fail.
    pub fn failing_edits_for(mut self, task_id: u64) -> Self {
        self.fail_edits_for.insert(task_id);
        self
    }

    /// Make every fetch fail.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Edits submitted so far, in order.
    pub fn edits(&self) -> Vec<SubmittedEdit> {
        self.edits.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads {
            return Err(TriageError::RemoteReadFailure("mock tracker unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Tracker for MockTracker {
    async fn fetch_open_tasks(&self, _board_id: &str) -> Result<Vec<Task>> {
        self.check_reads()?;
        Ok(self.tasks.clone())
    }

    async fn fetch_transactions(&self, task_ids: &[u64]) -> Result<HashMap<u64, Vec<Transaction>>> {
        self.check_reads()?;
        Ok(task_ids
            .iter()
            .filter_map(|id| self.transactions.get(id).map(|txs| (*id, txs.clone())))
            .collect())
    }

    async fn fetch_columns(&self, _board_id: &str) -> Result<HashMap<String, String>> {
        self.check_reads()?;
        Ok(self.columns.clone())
    }

    async fn submit_edit(&self, task: &Task, priority_code: &str) -> Result<()> {
        if self.fail_edits_for.contains(&task.id) {
            return Err(TriageError::RemoteWriteFailure {
                task_id: task.id,
                code: priority_code.to_string(),
                message: "mock edit rejected".to_string(),
            });
        }
        let mut edits = self
            .edits
            .lock()
            .map_err(|_| TriageError::RemoteWriteFailure {
                task_id: task.id,
                code: priority_code.to_string(),
                message: "edit log poisoned".to_string(),
            })?;
        edits.push(SubmittedEdit {
            task_id: task.id,
            code: priority_code.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: u64) -> Task {
        Task::new(id, format!("PHID-TASK-{}", id), "t", "u")
    }

    #[tokio::test]
    async fn test_mock_returns_requested_histories() {
        let tracker = MockTracker::new()
            .with_task(task(1), vec![Transaction::priority(1, Utc::now(), 50)])
            .with_task(task(2), vec![]);

        let histories = tracker.fetch_transactions(&[1]).await.unwrap();
        assert_eq!(histories.len(), 1);
        assert!(histories.contains_key(&1));
    }

    #[tokio::test]
    async fn test_mock_records_edits() {
        let tracker = MockTracker::new();
        tracker.submit_edit(&task(3), "triage").await.unwrap();
        tracker.submit_edit(&task(3), "high").await.unwrap();

        let edits = tracker.edits();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[1], SubmittedEdit { task_id: 3, code: "high".to_string() });
    }

    #[tokio::test]
    async fn test_mock_failing_edits() {
        let tracker = MockTracker::new().failing_edits_for(3);
        let err = tracker.submit_edit(&task(3), "high").await.unwrap_err();
        assert!(matches!(err, TriageError::RemoteWriteFailure { task_id: 3, .. }));
        assert!(tracker.edits().is_empty());
    }

    #[tokio::test]
    async fn test_mock_failing_reads() {
        let tracker = MockTracker::new().failing_reads();
        assert!(tracker.fetch_open_tasks("b").await.is_err());
        assert!(tracker.fetch_columns("b").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_orphan_task_has_no_history() {
        let tracker = MockTracker::new().with_orphan_task(task(9));
        assert_eq!(tracker.fetch_open_tasks("b").await.unwrap().len(), 1);
        assert!(tracker.fetch_transactions(&[9]).await.unwrap().is_empty());
    }
}
