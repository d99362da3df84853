//! Staleness audit - everything between the fetched board and the review queue
//!
//! This module provides:
//! - Column resolution from task history
//! - Effective priority and age extraction
//! - Staleness classification against a threshold policy
//! - Task/history correlation, selection and ranking

pub mod column;
pub mod extract;
pub mod select;
pub mod staleness;

pub use column::resolve_column;
pub use extract::{PriorityAge, extract_priority};
pub use select::{ReviewItem, Selection, Selector, TaskHistory, correlate, rank};
pub use staleness::{StaleReason, StalenessPolicy, is_stale};
