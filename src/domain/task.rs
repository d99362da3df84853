//! Open tasks as returned by the tracker.

use serde::{Deserialize, Serialize};

/// A task on the board. Read-only here; owned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Numeric id (the `123` in `T123`)
    pub id: u64,
    /// Tracker object identifier, used when submitting edits
    pub phid: String,
    pub title: String,
    pub uri: String,
}

impl Task {
    pub fn new(id: u64, phid: impl Into<String>, title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id,
            phid: phid.into(),
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Short monogram, e.g. `T123`
    pub fn monogram(&self) -> String {
        format!("T{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monogram() {
        let task = Task::new(123, "PHID-TASK-abc", "Broken login", "https://tracker/T123");
        assert_eq!(task.monogram(), "T123");
        assert_eq!(task.phid, "PHID-TASK-abc");
    }
}
