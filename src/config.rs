use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::i18n::Locale;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub kinmcp: KinmcpConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// KinMcp-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KinmcpConfig {
    /// SQLite file holding the family members.
    pub db_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Label language: "fa" or "en".
    #[serde(default = "default_locale")]
    pub locale: String,
}

/// Member search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_locale() -> String {
    "fa".to_string()
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    200
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KINMCP_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KINMCP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Load and validate a specific config file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config = Self::from_toml(&config_str)?;
        log::debug!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.kinmcp.db_path.as_os_str().is_empty() {
            anyhow::bail!("kinmcp.db_path must not be empty");
        }

        self.kinmcp
            .locale
            .parse::<Locale>()
            .with_context(|| format!("Invalid kinmcp.locale: {}", self.kinmcp.locale))?;

        if self.search.default_limit == 0 {
            anyhow::bail!("search.default_limit must be greater than 0");
        }

        if self.search.default_limit > self.search.max_limit {
            anyhow::bail!("search.default_limit must not exceed search.max_limit");
        }

        Ok(())
    }

    /// Get database path
    pub fn db_path(&self) -> &Path {
        &self.kinmcp.db_path
    }

    /// Label locale (validated on load)
    pub fn locale(&self) -> Locale {
        self.kinmcp.locale.parse().unwrap_or_default()
    }

    /// Clamp a requested search limit to the configured bounds
    pub fn search_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.search.default_limit)
            .clamp(1, self.search.max_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_CONFIG: &str = r#"
[kinmcp]
db_path = "./family.db"
log_level = "debug"
locale = "en"

[search]
default_limit = 5
max_limit = 50
"#;

    fn with_config_env(config_path: &Path, f: impl FnOnce()) {
        let original = std::env::var("KINMCP_CONFIG").ok();
        std::env::set_var("KINMCP_CONFIG", config_path.to_str().unwrap());
        f();
        std::env::remove_var("KINMCP_CONFIG");
        if let Some(val) = original {
            std::env::set_var("KINMCP_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_config_env(&config_path, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.kinmcp.log_level, "debug");
            assert_eq!(config.locale(), Locale::En);
            assert_eq!(config.search.default_limit, 5);
        });
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_toml("[kinmcp]\ndb_path = \"family.db\"\n").unwrap();
        assert_eq!(config.locale(), Locale::Fa);
        assert_eq!(config.kinmcp.log_level, "info");
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.search.max_limit, 200);
    }

    #[test]
    fn test_config_rejects_unknown_locale() {
        let err = Config::from_toml("[kinmcp]\ndb_path = \"f.db\"\nlocale = \"de\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("locale"));
    }

    #[test]
    fn test_config_rejects_bad_limits() {
        let text = "[kinmcp]\ndb_path = \"f.db\"\n[search]\ndefault_limit = 0\n";
        assert!(Config::from_toml(text).is_err());
        let text = "[kinmcp]\ndb_path = \"f.db\"\n[search]\ndefault_limit = 30\nmax_limit = 10\n";
        assert!(Config::from_toml(text).is_err());
    }

    #[test]
    fn test_search_limit_clamped() {
        let config = Config::from_toml(TEST_CONFIG).unwrap();
        assert_eq!(config.search_limit(None), 5);
        assert_eq!(config.search_limit(Some(0)), 1);
        assert_eq!(config.search_limit(Some(500)), 50);
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("KINMCP_CONFIG").ok();
        std::env::set_var("KINMCP_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("KINMCP_CONFIG");
        if let Some(v) = original {
            std::env::set_var("KINMCP_CONFIG", v);
        }
    }
}
