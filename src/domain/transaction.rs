//! Task transactions: the append-only history a task's state is derived from.
//!
//! The tracker is loose about scalar encoding (`"1600000000"` and
//! `1600000000` both show up for timestamps and ids), so both are accepted.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transaction type that records a priority change.
pub const PRIORITY_TRANSACTION: &str = "priority";

/// Transaction type that records a workboard column move.
pub const COLUMNS_TRANSACTION: &str = "core:columns";

/// One immutable history entry for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "taskID", deserialize_with = "flexible_u64")]
    pub task_id: u64,

    #[serde(rename = "transactionType")]
    pub transaction_type: String,

    #[serde(rename = "dateCreated", deserialize_with = "epoch_seconds", serialize_with = "ser_epoch_seconds")]
    pub date_created: DateTime<Utc>,

    #[serde(rename = "newValue", default)]
    pub new_value: Value,
}

impl Transaction {
    pub fn new(task_id: u64, transaction_type: impl Into<String>, date_created: DateTime<Utc>, new_value: Value) -> Self {
        Self {
            task_id,
            transaction_type: transaction_type.into(),
            date_created,
            new_value,
        }
    }

    /// Build a priority change entry.
    pub fn priority(task_id: u64, date_created: DateTime<Utc>, level: i64) -> Self {
        Self::new(task_id, PRIORITY_TRANSACTION, date_created, Value::from(level))
    }

    /// Build a column move entry onto `board`.
    pub fn column_move(task_id: u64, date_created: DateTime<Utc>, board: &str, column: &str) -> Self {
        Self::new(
            task_id,
            COLUMNS_TRANSACTION,
            date_created,
            serde_json::json!([{ "columnPHID": column, "boardPHID": board, "fromColumnPHIDs": {} }]),
        )
    }

    pub fn is_priority(&self) -> bool {
        self.transaction_type == PRIORITY_TRANSACTION
    }

    pub fn is_column_move(&self) -> bool {
        self.transaction_type == COLUMNS_TRANSACTION
    }

    /// Numeric priority level carried by a priority entry.
    pub fn priority_level(&self) -> Option<i64> {
        if !self.is_priority() {
            return None;
        }
        value_as_i64(&self.new_value)
    }

    /// Column this entry moved the task into on `board`, if any.
    pub fn column_on_board(&self, board: &str) -> Option<&str> {
        if !self.is_column_move() {
            return None;
        }
        let on_board = |v: &Value| v.get("boardPHID").and_then(Value::as_str) == Some(board);
        let placement = match &self.new_value {
            Value::Array(items) => items.iter().find(|v| on_board(*v)),
            Value::Object(_) if on_board(&self.new_value) => Some(&self.new_value),
            _ => None,
        };
        placement.and_then(|v| v.get("columnPHID")).and_then(Value::as_str)
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flexible_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_i64(&value)
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| de::Error::custom(format!("expected an id, got {}", value)))
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_as_i64(&value)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| de::Error::custom(format!("expected epoch seconds, got {}", value)))
}

fn ser_epoch_seconds<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(date.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_string_scalars() {
        let tx: Transaction = serde_json::from_value(json!({
            "taskID": "12",
            "transactionID": "301",
            "transactionType": "priority",
            "oldValue": 90,
            "newValue": "80",
            "dateCreated": "1600000000",
            "comments": null
        }))
        .unwrap();

        assert_eq!(tx.task_id, 12);
        assert_eq!(tx.date_created.timestamp(), 1_600_000_000);
        assert_eq!(tx.priority_level(), Some(80));
    }

    #[test]
    fn test_deserialize_numeric_scalars() {
        let tx: Transaction = serde_json::from_value(json!({
            "taskID": 12,
            "transactionType": "priority",
            "newValue": 50,
            "dateCreated": 1600000000
        }))
        .unwrap();

        assert_eq!(tx.priority_level(), Some(50));
    }

    #[test]
    fn test_deserialize_missing_new_value() {
        let tx: Transaction = serde_json::from_value(json!({
            "taskID": 12,
            "transactionType": "core:create",
            "dateCreated": 1600000000
        }))
        .unwrap();

        assert_eq!(tx.new_value, Value::Null);
        assert_eq!(tx.priority_level(), None);
    }

    #[test]
    fn test_deserialize_bad_date() {
        let result = serde_json::from_value::<Transaction>(json!({
            "taskID": 12,
            "transactionType": "priority",
            "dateCreated": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_priority_level_ignores_other_types() {
        let tx = Transaction::new(1, "status", Utc::now(), json!(80));
        assert_eq!(tx.priority_level(), None);
    }

    #[test]
    fn test_column_on_board_list_form() {
        let tx = Transaction::new(
            1,
            COLUMNS_TRANSACTION,
            Utc::now(),
            json!([
                { "columnPHID": "PHID-PCOL-other", "boardPHID": "PHID-PROJ-other" },
                { "columnPHID": "PHID-PCOL-backlog", "boardPHID": "PHID-PROJ-board" }
            ]),
        );
        assert_eq!(tx.column_on_board("PHID-PROJ-board"), Some("PHID-PCOL-backlog"));
        assert_eq!(tx.column_on_board("PHID-PROJ-none"), None);
    }

    #[test]
    fn test_column_on_board_object_form() {
        let tx = Transaction::new(
            1,
            COLUMNS_TRANSACTION,
            Utc::now(),
            json!({ "columnPHID": "PHID-PCOL-doing", "boardPHID": "PHID-PROJ-board" }),
        );
        assert_eq!(tx.column_on_board("PHID-PROJ-board"), Some("PHID-PCOL-doing"));
    }

    #[test]
    fn test_column_move_helper() {
        let tx = Transaction::column_move(3, Utc::now(), "PHID-PROJ-b", "PHID-PCOL-c");
        assert!(tx.is_column_move());
        assert_eq!(tx.column_on_board("PHID-PROJ-b"), Some("PHID-PCOL-c"));
    }
}
