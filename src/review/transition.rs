//! Priority transitions and how they are written back.
//!
//! The tracker silently ignores an edit that sets the value already on
//! record: no transaction, no refresh. To make a re-confirmed priority
//! register, the edit is bounced through Needs Triage first. Re-verify this
//! against the tracker version in use; newer releases may record same-value
//! edits.

use crate::domain::{Priority, Task};
use crate::error::Result;
use crate::tracker::Tracker;

/// The edits needed to move a task from one priority to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already at Needs Triage and staying there: nothing to write.
    Unchanged,
    /// Same priority re-confirmed: write `via`, then `to`.
    Bounce { via: Priority, to: Priority },
    /// Different priority: write `to`.
    Direct { to: Priority },
}

impl Transition {
    pub fn plan(old: Priority, new: Priority) -> Transition {
        if old == new && new.is_needs_triage() {
            Transition::Unchanged
        } else if old == new {
            Transition::Bounce {
                via: Priority::NEEDS_TRIAGE,
                to: new,
            }
        } else {
            Transition::Direct { to: new }
        }
    }

    /// Edits to submit, in order.
    pub fn edits(&self) -> Vec<Priority> {
        match *self {
            Transition::Unchanged => vec![],
            Transition::Bounce { via, to } => vec![via, to],
            Transition::Direct { to } => vec![to],
        }
    }
}

/// Writes transitions to the tracker, one edit at a time.
pub struct Applier<'a> {
    tracker: &'a dyn Tracker,
    dry_run: bool,
}

impl<'a> Applier<'a> {
    pub fn new(tracker: &'a dyn Tracker) -> Self {
        Self { tracker, dry_run: false }
    }

    /// Log edits instead of submitting them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Submit the transition's edits in order; stops at the first failure.
    ///
    /// Edits already accepted are not rolled back. Returns the edits that
    /// were issued.
    pub async fn apply(&self, task: &Task, transition: Transition) -> Result<Vec<Priority>> {
        let edits = transition.edits();
        for priority in &edits {
            if self.dry_run {
                log::info!("[dry-run] would set {} to '{}'", task.monogram(), priority.code());
                continue;
            }
            self.tracker.submit_edit(task, priority.code()).await?;
        }
        Ok(edits)
    }
}
