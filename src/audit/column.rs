//! Column placement derived from a task's history.

use crate::domain::Transaction;

/// Resolve which column of `board_id` a task sits in.
///
/// Scans in history order (not time order) and takes the first column move
/// onto the tracked board. `None` means the task is unresolved and gets
/// excluded downstream.
pub fn resolve_column<'a>(transactions: &'a [Transaction], board_id: &str) -> Option<&'a str> {
    transactions.iter().find_map(|tx| tx.column_on_board(board_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    const BOARD: &str = "PHID-PROJ-board";

    #[test]
    fn test_no_transactions() {
        assert_eq!(resolve_column(&[], BOARD), None);
    }

    #[test]
    fn test_no_column_moves() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let txs = vec![Transaction::priority(1, t, 80)];
        assert_eq!(resolve_column(&txs, BOARD), None);
    }

    #[test]
    fn test_other_board_is_ignored() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let txs = vec![Transaction::column_move(1, t, "PHID-PROJ-other", "PHID-PCOL-x")];
        assert_eq!(resolve_column(&txs, BOARD), None);
    }

    #[test]
    fn test_first_match_in_history_order_wins() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        // History order, not timestamp order, decides
        let txs = vec![
            Transaction::column_move(1, early, BOARD, "PHID-PCOL-first"),
            Transaction::column_move(1, late, BOARD, "PHID-PCOL-second"),
        ];
        assert_eq!(resolve_column(&txs, BOARD), Some("PHID-PCOL-first"));
    }

    #[test]
    fn test_skips_moves_without_board_match() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let txs = vec![
            Transaction::new(1, "core:columns", t, json!("garbage")),
            Transaction::column_move(1, t, "PHID-PROJ-other", "PHID-PCOL-x"),
            Transaction::column_move(1, t, BOARD, "PHID-PCOL-y"),
        ];
        assert_eq!(resolve_column(&txs, BOARD), Some("PHID-PCOL-y"));
    }
}
