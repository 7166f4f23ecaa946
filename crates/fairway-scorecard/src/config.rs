use std::path::PathBuf;

use serde::Deserialize;

use fairway_nassau::PressRule;

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "fairway.toml";
pub const DEFAULT_STORAGE_KEY: &str = "golfGameState";

/// Host configuration, loaded from `fairway.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScorecardConfig {
    /// Directory the file store keeps rounds in.
    pub data_dir: PathBuf,
    /// Key the active round is saved under.
    pub storage_key: String,
    pub autosave: AutosaveConfig,
    pub defaults: GameDefaults,
}

impl Default for ScorecardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".fairway"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            autosave: AutosaveConfig::default(),
            defaults: GameDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last change before the round is written.
    pub quiet_period_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 500,
        }
    }
}

impl AutosaveConfig {
    pub fn quiet_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.quiet_period_ms)
    }
}

/// Stakes and options for new rounds. Unset values keep each game's default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameDefaults {
    /// Nassau, Skins and Bloodsome stake.
    pub wager: Option<f64>,
    /// Wolf, Bingo, Stableford, Banker and Vegas point value.
    pub point_value: Option<f64>,
    pub lone_multiplier: Option<i32>,
    pub press_rule: Option<PressRule>,
    /// Banker quota for every player.
    pub quota: Option<i32>,
}

impl ScorecardConfig {
    /// Check value ranges. The first problem found is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::new("storage_key", "must not be empty"));
        }
        if self.autosave.quiet_period_ms == 0 {
            return Err(ConfigError::new("autosave.quiet_period_ms", "must be > 0"));
        }
        if let Some(wager) = self.defaults.wager
            && !(wager.is_finite() && wager >= 0.0)
        {
            return Err(ConfigError::new("defaults.wager", "must be a non-negative amount"));
        }
        if let Some(value) = self.defaults.point_value
            && !(value.is_finite() && value >= 0.0)
        {
            return Err(ConfigError::new(
                "defaults.point_value",
                "must be a non-negative amount",
            ));
        }
        if let Some(mult) = self.defaults.lone_multiplier
            && mult < 1
        {
            return Err(ConfigError::new("defaults.lone_multiplier", "must be >= 1"));
        }
        if let Some(quota) = self.defaults.quota
            && !(0..=108).contains(&quota)
        {
            return Err(ConfigError::new("defaults.quota", "must be between 0 and 108"));
        }
        Ok(())
    }

    /// Load config from `fairway.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(content) => Self::parse(&content),
            Err(_) => {
                tracing::info!("No {CONFIG_FILE} found, using defaults");
                ScorecardConfig::default()
            },
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    fn parse(content: &str) -> Self {
        match toml::from_str::<ScorecardConfig>(content) {
            Ok(cfg) => {
                tracing::info!("Loaded configuration from {CONFIG_FILE}");
                cfg
            },
            Err(e) => {
                tracing::warn!("Failed to parse {CONFIG_FILE}: {e}, using defaults");
                ScorecardConfig::default()
            },
        }
    }

    /// Apply `FAIRWAY_*` overrides read through `var`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var("FAIRWAY_DATA_DIR")
            && !dir.is_empty()
        {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = var("FAIRWAY_STORAGE_KEY")
            && !key.is_empty()
        {
            self.storage_key = key;
        }
        if let Some(val) = var("FAIRWAY_AUTOSAVE_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.autosave.quiet_period_ms = ms;
        }
        self
    }
}
