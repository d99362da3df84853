//! Domain types for stale-triage
//!
//! - Priority: the closed, ordered priority table and its staleness rules
//! - Task: an open task on the board
//! - Transaction: one entry of a task's history

pub mod priority;
pub mod task;
pub mod transaction;

pub use priority::{PRIORITY_TABLE, Priority, PriorityRecord};
pub use task::Task;
pub use transaction::{COLUMNS_TRANSACTION, PRIORITY_TRANSACTION, Transaction};
