//! Configuration system for stale-triage.
//!
//! One YAML file, loaded once before the audit runs, with command-line
//! overrides for the board and its tracked columns.

use eyre::Result;
use std::path::PathBuf;

pub use self::global::GlobalConfig;

mod global;

pub type Config = GlobalConfig;

/// Default environment variable for the tracker API token.
pub const DEFAULT_TOKEN_ENV: &str = "CONDUIT_API_TOKEN";

/// Load configuration from the standard search paths.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. .stale-triage.yml in current directory (project config)
/// 3. ~/.config/stale-triage/stale-triage.yml (user config)
/// 4. Default values
pub fn load_config(explicit_path: Option<&PathBuf>) -> Result<GlobalConfig> {
    GlobalConfig::load(explicit_path)
}

/// Apply command-line overrides on top of a loaded config.
pub fn apply_overrides(mut config: GlobalConfig, board: Option<&str>, columns: &[String]) -> GlobalConfig {
    if let Some(board) = board {
        config.board.id = board.to_string();
    }
    if !columns.is_empty() {
        config.board.tracked_columns = columns.to_vec();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_board_and_columns() {
        let config = apply_overrides(
            GlobalConfig::default(),
            Some("PHID-PROJ-cli"),
            &["PHID-PCOL-1".to_string()],
        );
        assert_eq!(config.board.id, "PHID-PROJ-cli");
        assert_eq!(config.board.tracked_columns, vec!["PHID-PCOL-1".to_string()]);
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let mut base = GlobalConfig::default();
        base.board.id = "PHID-PROJ-file".to_string();
        base.board.tracked_columns = vec!["PHID-PCOL-f".to_string()];

        let config = apply_overrides(base, None, &[]);
        assert_eq!(config.board.id, "PHID-PROJ-file");
        assert_eq!(config.board.tracked_columns.len(), 1);
    }
}
