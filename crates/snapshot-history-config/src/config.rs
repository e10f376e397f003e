/// Tool configuration: load, save, and sanitize.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snapshot_history::config::{default_ignore_keys, DEFAULT_LIMIT};
use snapshot_history::HistoryConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "SNAPSHOT_HISTORY_CONFIG";

/// Upper bound for the undo limit accepted from a config file.
const MAX_LIMIT: usize = 10_000;

/// Top-level tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Max undo entries kept per session.
    pub limit: usize,
    /// Top-level snapshot fields excluded from history.
    pub ignore_keys: BTreeSet<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Whether JSON output is pretty-printed.
    pub pretty_output: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            ignore_keys: default_ignore_keys(),
            log_filter: "info".to_string(),
            pretty_output: true,
        }
    }
}

impl ToolConfig {
    /// Returns the config file path.
    ///
    /// Resolution order:
    /// 1. `SNAPSHOT_HISTORY_CONFIG` environment variable
    /// 2. `snapshot-history/config.json` in the platform config directory
    /// 3. `snapshot-history.json` in the working directory
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("snapshot-history").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("snapshot-history.json"))
    }

    /// Reads and sanitizes config from `path`.
    ///
    /// Returns `Ok(None)` when no file exists, so callers can tell a missing
    /// file from a broken one and report the latter once logging is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let mut config: ToolConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.sanitize();
        Ok(Some(config))
    }

    /// Loads config from `path`.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                // Return defaults on error (don't overwrite broken file)
                tracing::warn!("{e:#}");
                Self::default()
            }
        }
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        if let Err(e) = config.save(path) {
            tracing::warn!("Failed to create default config at {}: {e:#}", path.display());
        }
        config
    }

    /// Saves config to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Clamps values to valid ranges and resets invalid fields.
    pub fn sanitize(&mut self) {
        self.limit = self.limit.clamp(1, MAX_LIMIT);
        self.ignore_keys = std::mem::take(&mut self.ignore_keys)
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if self.log_filter.trim().is_empty() {
            self.log_filter = "info".to_string();
        }
    }

    /// The history settings this config describes.
    pub fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            limit: self.limit,
            ignore_keys: self.ignore_keys.clone(),
        }
    }
}
