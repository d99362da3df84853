//! Staleness classification.
//!
//! Rules, in order:
//! - Wishlist is never stale
//! - Needs Triage is always stale
//! - Anything else is stale once its age strictly exceeds its threshold
//!
//! Thresholds come from the priority table; a policy can override them for
//! the thresholded levels only.

use std::collections::HashMap;
use std::fmt;

use chrono::TimeDelta;

use crate::domain::Priority;
use crate::error::{Result, TriageError};

/// Why a task was flagged for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// Sitting at the default priority
    NeedsTriage,
    /// Held a priority longer than its threshold allows
    Expired {
        priority: Priority,
        threshold: String,
        elapsed: TimeDelta,
    },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::NeedsTriage => write!(f, "needs triage"),
            StaleReason::Expired {
                priority,
                threshold,
                elapsed,
            } => write!(
                f,
                "was at priority {} for longer than {} ({} days)",
                priority,
                threshold,
                elapsed.num_days()
            ),
        }
    }
}

/// Staleness thresholds, defaulting to the priority table.
#[derive(Debug, Clone, Default)]
pub struct StalenessPolicy {
    overrides: HashMap<Priority, TimeDelta>,
}

impl StalenessPolicy {
    /// Policy using the table thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the threshold for one thresholded priority.
    ///
    /// Needs Triage and Wishlist have fixed rules and cannot be overridden.
    pub fn with_threshold_days(mut self, priority: Priority, days: i64) -> Result<Self> {
        let record = priority.record();
        if record.never_stale || record.always_stale {
            return Err(TriageError::Config(format!(
                "priority '{}' has a fixed staleness rule and takes no threshold",
                record.code
            )));
        }
        if days <= 0 {
            return Err(TriageError::Config(format!(
                "threshold for '{}' must be positive, got {}",
                record.code, days
            )));
        }
        let threshold = TimeDelta::try_days(days).ok_or_else(|| {
            TriageError::Config(format!(
                "threshold for '{}' is out of range: {} days",
                record.code, days
            ))
        })?;
        self.overrides.insert(priority, threshold);
        Ok(self)
    }

    /// Build a policy from `code -> days` overrides.
    pub fn from_overrides(overrides: &HashMap<String, i64>) -> Result<Self> {
        let mut policy = Self::new();
        for (code, days) in overrides {
            let priority = Priority::from_code(code)
                .ok_or_else(|| TriageError::Config(format!("unknown priority code '{}'", code)))?;
            policy = policy.with_threshold_days(priority, *days)?;
        }
        Ok(policy)
    }

    pub fn threshold(&self, priority: Priority) -> Option<TimeDelta> {
        match self.overrides.get(&priority) {
            Some(threshold) => Some(*threshold),
            None => priority.record().threshold(),
        }
    }

    /// Human label for a priority's threshold.
    pub fn threshold_label(&self, priority: Priority) -> String {
        match self.overrides.get(&priority) {
            Some(threshold) => format!("{} days", threshold.num_days()),
            None => priority.record().threshold_label.to_string(),
        }
    }

    pub fn is_stale(&self, priority: Priority, elapsed: TimeDelta) -> bool {
        self.classify(priority, elapsed).is_some()
    }

    /// Classify a priority held for `elapsed`; `Some` means stale.
    pub fn classify(&self, priority: Priority, elapsed: TimeDelta) -> Option<StaleReason> {
        let record = priority.record();
        if record.never_stale {
            return None;
        }
        if record.always_stale {
            return Some(StaleReason::NeedsTriage);
        }
        let threshold = self.threshold(priority)?;
        (elapsed > threshold).then(|| StaleReason::Expired {
            priority,
            threshold: self.threshold_label(priority),
            elapsed,
        })
    }
}

/// Classify with the default table thresholds.
pub fn is_stale(priority: Priority, elapsed: TimeDelta) -> bool {
    StalenessPolicy::default().is_stale(priority, elapsed)
}
