//! Global configuration.
//!
//! Loaded from ~/.config/stale-triage/stale-triage.yml or .stale-triage.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stale_triage::audit::StalenessPolicy;
use stale_triage::tracker::ConduitConfig;

/// Global configuration for stale-triage.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Tracker connection settings.
    pub tracker: TrackerConfig,

    /// Board being audited.
    pub board: BoardConfig,

    /// Threshold overrides in days, keyed by priority code.
    pub staleness: HashMap<String, i64>,
}

impl GlobalConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .stale-triage.yml in current directory
    /// 3. ~/.config/stale-triage/stale-triage.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".stale-triage.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .stale-triage.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .stale-triage.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stale-triage").join("stale-triage.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tracker.base_url.trim().is_empty() {
            eyre::bail!("tracker.base-url must be set");
        }
        if self.tracker.timeout_ms == 0 {
            eyre::bail!("tracker.timeout-ms must be > 0");
        }
        if self.board.id.trim().is_empty() {
            eyre::bail!("board.id must be set");
        }
        if self.board.tracked_columns.is_empty() {
            eyre::bail!("board.tracked-columns must list at least one column");
        }
        self.staleness_policy()?;
        Ok(())
    }

    /// Staleness policy with the configured overrides applied.
    pub fn staleness_policy(&self) -> Result<StalenessPolicy> {
        StalenessPolicy::from_overrides(&self.staleness).context("Invalid staleness overrides")
    }

    /// Tracked columns as a set.
    pub fn tracked_columns(&self) -> HashSet<String> {
        self.board.tracked_columns.iter().cloned().collect()
    }

    /// Conduit client settings, with the token read from the environment.
    pub fn conduit(&self) -> Result<ConduitConfig> {
        let token = std::env::var(&self.tracker.api_token_env)
            .with_context(|| format!("API token not set: export {}", self.tracker.api_token_env))?;
        Ok(ConduitConfig::new(&self.tracker.base_url, token)
            .with_timeout(Duration::from_millis(self.tracker.timeout_ms)))
    }
}

/// Tracker connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL of the tracker.
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable holding the API token.
    #[serde(rename = "api-token-env")]
    pub api_token_env: String,

    /// Timeout per request in milliseconds.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token_env: crate::config::DEFAULT_TOKEN_ENV.to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Board settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board (project) identifier.
    pub id: String,

    /// Columns whose tasks are audited.
    #[serde(rename = "tracked-columns")]
    pub tracked_columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stale_triage::domain::Priority;
    use tempfile::TempDir;

    fn valid() -> GlobalConfig {
        GlobalConfig {
            tracker: TrackerConfig {
                base_url: "https://tracker.example.org".to_string(),
                ..Default::default()
            },
            board: BoardConfig {
                id: "PHID-PROJ-board".to_string(),
                tracked_columns: vec!["PHID-PCOL-a".to_string()],
            },
            staleness: HashMap::new(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.tracker.timeout_ms, 30_000);
        assert_eq!(config.tracker.api_token_env, "CONDUIT_API_TOKEN");
        assert!(config.board.tracked_columns.is_empty());
    }

    #[test]
    fn test_default_config_is_incomplete() {
        assert!(GlobalConfig::default().validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = valid();
        config.board.tracked_columns.clear();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.tracker.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.staleness.insert("triage".to_string(), 3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
tracker:
  base-url: https://tracker.example.org
  timeout-ms: 5000
board:
  id: PHID-PROJ-board
  tracked-columns: [PHID-PCOL-a, PHID-PCOL-b]
staleness:
  high: 60
"#;
        let config: GlobalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tracker.timeout_ms, 5000);
        assert_eq!(config.board.tracked_columns.len(), 2);
        // Other fields should have defaults
        assert_eq!(config.tracker.api_token_env, "CONDUIT_API_TOKEN");

        let policy = config.staleness_policy().unwrap();
        assert_eq!(policy.threshold_label(Priority::HIGH), "60 days");
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("triage.yml");
        fs::write(&path, "board:\n  id: PHID-PROJ-x\n").unwrap();

        let config = GlobalConfig::load(Some(&path)).unwrap();
        assert_eq!(config.board.id, "PHID-PROJ-x");
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");
        assert!(GlobalConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_conduit_requires_token() {
        let mut config = valid();
        config.tracker.api_token_env = "STALE_TRIAGE_TEST_UNSET_TOKEN".to_string();
        assert!(config.conduit().is_err());
    }
}
