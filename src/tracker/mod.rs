//! Tracker layer - the remote issue tracker the audit reads from and writes to
//!
//! This module provides:
//! - Tracker trait for the four remote operations
//! - ConduitClient implementation over HTTP
//! - MockTracker for tests

pub mod client;
pub mod conduit;

pub use client::{MockTracker, SubmittedEdit, Tracker};
pub use conduit::{ConduitClient, ConduitConfig};
