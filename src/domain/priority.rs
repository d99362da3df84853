//! Priority levels and their staleness rules.
//!
//! Every level is a row in one ordered table so that the display name, the
//! edit code, the staleness threshold and the two special rules (needs-triage
//! is always stale, wishlist is never stale) live side by side.

use std::cmp::Ordering;
use std::fmt;

use chrono::TimeDelta;

/// One row of the priority table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityRecord {
    /// Numeric level as stored by the tracker.
    pub level: i64,
    /// Display name.
    pub name: &'static str,
    /// Code used when writing an edit back.
    pub code: &'static str,
    /// Maximum age before the priority is considered stale, in days.
    pub threshold_days: Option<i64>,
    /// Human label for the threshold.
    pub threshold_label: &'static str,
    /// Never flagged, whatever its age.
    pub never_stale: bool,
    /// Always flagged, whatever its age.
    pub always_stale: bool,
}

impl PriorityRecord {
    /// Threshold as a duration, if this level has one.
    pub fn threshold(&self) -> Option<TimeDelta> {
        self.threshold_days.map(TimeDelta::days)
    }
}

/// Priority table, highest level first.
///
/// Thresholds are "7 units" of growing granularity: a week, 7 weeks,
/// 7 months, 7 quarters.
pub static PRIORITY_TABLE: [PriorityRecord; 6] = [
    PriorityRecord {
        level: 100,
        name: "Unbreak Now!",
        code: "unbreak",
        threshold_days: Some(7),
        threshold_label: "a week",
        never_stale: false,
        always_stale: false,
    },
    PriorityRecord {
        level: 90,
        name: "Needs Triage",
        code: "triage",
        threshold_days: None,
        threshold_label: "",
        never_stale: false,
        always_stale: true,
    },
    PriorityRecord {
        level: 80,
        name: "High",
        code: "high",
        threshold_days: Some(49),
        threshold_label: "7 weeks",
        never_stale: false,
        always_stale: false,
    },
    PriorityRecord {
        level: 50,
        name: "Normal",
        code: "normal",
        threshold_days: Some(210),
        threshold_label: "7 months",
        never_stale: false,
        always_stale: false,
    },
    PriorityRecord {
        level: 25,
        name: "Low",
        code: "low",
        threshold_days: Some(630),
        threshold_label: "7 quarters",
        never_stale: false,
        always_stale: false,
    },
    PriorityRecord {
        level: 10,
        name: "Wishlist",
        code: "wish",
        threshold_days: None,
        threshold_label: "",
        never_stale: true,
        always_stale: false,
    },
];

/// A priority level from the closed set {100, 90, 80, 50, 25, 10}.
///
/// Holds a row index into [`PRIORITY_TABLE`]; values can only come from the
/// associated constants or from table lookups, so the index is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Priority(usize);

impl Priority {
    pub const UNBREAK_NOW: Priority = Priority(0);
    pub const NEEDS_TRIAGE: Priority = Priority(1);
    pub const HIGH: Priority = Priority(2);
    pub const NORMAL: Priority = Priority(3);
    pub const LOW: Priority = Priority(4);
    pub const WISHLIST: Priority = Priority(5);

    /// All priorities, highest first.
    pub fn all() -> impl Iterator<Item = Priority> {
        (0..PRIORITY_TABLE.len()).map(Priority)
    }

    /// Look up a priority by its numeric level.
    pub fn from_level(level: i64) -> Option<Priority> {
        PRIORITY_TABLE.iter().position(|r| r.level == level).map(Priority)
    }

    /// Look up a priority by its edit code.
    pub fn from_code(code: &str) -> Option<Priority> {
        PRIORITY_TABLE.iter().position(|r| r.code == code).map(Priority)
    }

    /// The table row for this priority.
    pub fn record(self) -> &'static PriorityRecord {
        &PRIORITY_TABLE[self.0]
    }

    pub fn level(self) -> i64 {
        self.record().level
    }

    pub fn name(self) -> &'static str {
        self.record().name
    }

    pub fn code(self) -> &'static str {
        self.record().code
    }

    /// The distinguished default for tasks that were never triaged.
    pub fn is_needs_triage(self) -> bool {
        self == Priority::NEEDS_TRIAGE
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NEEDS_TRIAGE
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level().cmp(&other.level())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
