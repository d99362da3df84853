//! Interactive re-triage of the review queue
//!
//! This module provides:
//! - Command: single-key operator decisions
//! - Operator trait with terminal and scripted implementations
//! - Transition state machine and the Applier that writes it back
//! - The review loop tying them together

pub mod command;
pub mod operator;
pub mod reconcile;
pub mod transition;

pub use command::Command;
pub use operator::{Operator, ScriptedOperator, Shown, TerminalOperator};
pub use reconcile::{ReviewSummary, read_command, review};
pub use transition::{Applier, Transition};
