//! The review loop: one prompt per queued task, one decision each.

use crate::audit::ReviewItem;
use crate::error::Result;
use crate::review::command::Command;
use crate::review::operator::Operator;
use crate::review::transition::{Applier, Transition};
use crate::tracker::Tracker;

/// Outcome counts for a review run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Items the operator decided on (exit does not count)
    pub reviewed: usize,
    /// Items that had at least one edit issued
    pub changed: usize,
    /// Items confirmed where they already were with nothing to write
    pub unchanged: usize,
    pub skipped: usize,
    /// Items whose edit the tracker rejected
    pub failed: usize,
    /// Operator quit before the end of the queue
    pub exited_early: bool,
}

/// Block until the operator presses a recognized key.
pub fn read_command(operator: &mut dyn Operator) -> Result<Command> {
    loop {
        let key = operator.read_key()?;
        match Command::from_key(key) {
            Some(command) => return Ok(command),
            None => operator.notify(&format!("Unrecognized key {:?}. {}", key, Command::legend())),
        }
    }
}

/// Walk the queue in order, prompting for each item and applying the choice.
///
/// A rejected edit is reported and the loop moves on; the task stays as the
/// tracker left it. Exit stops immediately, between items.
pub async fn review(
    tracker: &dyn Tracker,
    operator: &mut dyn Operator,
    queue: &[ReviewItem],
    dry_run: bool,
) -> Result<ReviewSummary> {
    let applier = Applier::new(tracker).with_dry_run(dry_run);
    let mut summary = ReviewSummary::default();
    let total = queue.len();

    for (index, item) in queue.iter().enumerate() {
        operator.show(item, index + 1, total);

        let command = read_command(operator)?;
        let target = match command {
            Command::Exit => {
                log::info!("Operator exited at {}/{}", index + 1, total);
                summary.exited_early = true;
                break;
            }
            Command::Skip => {
                summary.reviewed += 1;
                summary.skipped += 1;
                operator.notify("Skipped.");
                continue;
            }
            Command::SetPriority(target) => target,
        };

        summary.reviewed += 1;
        let transition = Transition::plan(item.priority, target);
        match applier.apply(&item.task, transition).await {
            Ok(edits) if edits.is_empty() => {
                summary.unchanged += 1;
                operator.notify(&format!("{} stays at {}.", item.task.monogram(), target));
            }
            Ok(_) => {
                summary.changed += 1;
                let verb = if dry_run { "Would set" } else { "Set" };
                operator.notify(&format!("{} {} to {}.", verb, item.task.monogram(), target));
            }
            Err(e) if !e.is_fatal() => {
                log::warn!("{}", e);
                summary.failed += 1;
                operator.notify(&format!("Edit failed, leaving {} as is: {}", item.task.monogram(), e));
            }
            Err(e) => return Err(e),
        }
    }

    log::info!("Review finished: {:?}", summary);
    Ok(summary)
}
