//! Dashboard settings
//!
//! Handles loading, validating and exporting `config.ron`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cooldowns::CooldownCategory;
use crate::regen::{RegenRate, ResourceKind};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "TORN_API_KEY";
/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "BARWATCH_CONFIG";

/// Canonical poll cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
/// Floor on the poll cadence to stay well inside the API rate limit
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("{kind:?} regeneration rate must gain at least one unit per tick")]
    InvalidRate { kind: ResourceKind },
    #[error("no API key configured (set TORN_API_KEY or api_key in the config file)")]
    MissingApiKey,
}

/// API endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// `selections` requested from the user endpoint
    pub selections: Vec<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.torn.com".to_string(),
            selections: vec!["bars".to_string(), "cooldowns".to_string(), "racing".to_string()],
            timeout_secs: 30,
        }
    }
}

/// Regeneration rate per bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenRates {
    pub energy: RegenRate,
    pub nerve: RegenRate,
}

impl RegenRates {
    pub fn get(&self, kind: ResourceKind) -> RegenRate {
        match kind {
            ResourceKind::Energy => self.energy,
            ResourceKind::Nerve => self.nerve,
        }
    }
}

impl Default for RegenRates {
    fn default() -> Self {
        Self {
            energy: RegenRate::ENERGY,
            nerve: RegenRate::NERVE,
        }
    }
}

/// Call-to-action URLs shown when an action is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownLinks {
    pub drug: String,
    pub medical: String,
    pub booster: String,
    pub racing: String,
}

impl CooldownLinks {
    pub fn get(&self, category: CooldownCategory) -> &str {
        match category {
            CooldownCategory::Drug => &self.drug,
            CooldownCategory::Medical => &self.medical,
            CooldownCategory::Booster => &self.booster,
        }
    }
}

impl Default for CooldownLinks {
    fn default() -> Self {
        Self {
            drug: "https://www.torn.com/item.php#drugs".to_string(),
            medical: "https://www.torn.com/factions.php?step=your#/tab=armoury".to_string(),
            booster: "https://www.torn.com/item.php#boosters".to_string(),
            racing: "https://www.torn.com/racing.php".to_string(),
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub api: ApiConfig,
    /// Seconds between polls
    pub poll_interval_secs: u64,
    pub rates: RegenRates,
    pub links: CooldownLinks,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api: ApiConfig::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            rates: RegenRates::default(),
            links: CooldownLinks::default(),
        }
    }
}

impl Config {
    /// Default location of `config.ron`
    pub fn default_path() -> PathBuf {
        use directories::ProjectDirs;

        if let Some(proj_dirs) = ProjectDirs::from("com", "barwatch", "Barwatch") {
            proj_dirs.config_dir().join("config.ron")
        } else {
            // Fallback to current directory
            PathBuf::from("./config.ron")
        }
    }

    /// `$BARWATCH_CONFIG` if set, otherwise [`Config::default_path`]
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path)
    }

    /// Load from [`Config::path`], then apply `$TORN_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_from(&Self::path())?;
        Ok(config.with_env_key(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = ron::from_str(&content)?;
        config.validate()?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the defaults as a starting point for editing
    pub fn export_default(path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = ron::ser::to_string_pretty(&Self::default(), ron::ser::PrettyConfig::default())?;
        fs::write(path, content).map_err(io_err)?;

        log::info!("Wrote default config to {}", path.display());
        Ok(())
    }

    /// Prefer a non-empty key from the environment over the file
    pub fn with_env_key(mut self, env_key: Option<String>) -> Self {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        self
    }

    /// Check values that would make predictions meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ResourceKind::ALL {
            if self.rates.get(kind).units_per_tick == 0 {
                return Err(ConfigError::InvalidRate { kind });
            }
        }
        Ok(())
    }

    /// Configured API key
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Poll cadence, never below [`MIN_POLL_INTERVAL`]
    pub fn poll_interval(&self) -> Duration {
        let requested = Duration::from_secs(self.poll_interval_secs);
        if requested < MIN_POLL_INTERVAL {
            log::warn!(
                "Poll interval of {}s is below the {}s minimum, clamping",
                requested.as_secs(),
                MIN_POLL_INTERVAL.as_secs()
            );
            MIN_POLL_INTERVAL
        } else {
            requested
        }
    }
}
