//! stale-triage - audit a board for tasks whose priority has gone stale
//!
//! Priorities and column placement are derived from each task's transaction
//! history. Tasks whose priority has outlived its threshold are queued by
//! priority and walked through interactively, writing the operator's choice
//! back to the tracker.

pub mod audit;
pub mod board;
pub mod domain;
pub mod error;
pub mod review;
pub mod tracker;

pub use error::{Result, TriageError};
