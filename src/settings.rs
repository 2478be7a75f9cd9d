//! Persistent field settings
//!
//! Stored as JSON under the user config directory and merged with command
//! line overrides at startup.

use crate::search_field::constants::{
    DEFAULT_BLUR_GRACE_MS, DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_RESULTS, DEFAULT_MINIMUM_QUERY_LENGTH,
};
use crate::search_field::domain::models::FieldConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "patient-lookup";

/// User configurable settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldSettings {
    /// Trimmed characters required before a lookup is issued
    pub minimum_query_length: usize,
    /// Debounce delay for search in milliseconds
    pub search_debounce_ms: u64,
    /// Maximum candidates shown
    pub max_results: usize,
    /// Grace period between losing focus and closing the list
    pub blur_grace_ms: u64,
    /// Simulated latency of the built-in directory
    pub lookup_latency_ms: u64,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            minimum_query_length: DEFAULT_MINIMUM_QUERY_LENGTH,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_results: DEFAULT_MAX_RESULTS,
            blur_grace_ms: DEFAULT_BLUR_GRACE_MS,
            lookup_latency_ms: 0,
        }
    }
}

impl From<&FieldSettings> for FieldConfig {
    fn from(settings: &FieldSettings) -> Self {
        FieldConfig {
            minimum_query_length: settings.minimum_query_length,
            debounce_ms: settings.search_debounce_ms,
            max_results: settings.max_results,
            blur_grace_ms: settings.blur_grace_ms,
        }
    }
}

/// Settings persistence manager
pub struct SettingsManager {
    config_path: PathBuf,
}

impl SettingsManager {
    /// Create a new settings manager with the default config path
    pub fn new() -> Self {
        Self {
            config_path: Self::get_config_dir().join(SETTINGS_FILE),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings from disk; a missing or empty file yields defaults
    pub fn load(&self) -> Result<FieldSettings> {
        if !self.config_path.exists() {
            return Ok(FieldSettings::default());
        }

        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read settings file {}", self.config_path.display())
        })?;
        if contents.trim().is_empty() {
            return Ok(FieldSettings::default());
        }

        serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse settings file {}", self.config_path.display())
        })
    }

    pub fn save(&self, settings: &FieldSettings) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.config_path, json).context("Failed to write settings file")?;
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<FieldSettings> {
        let settings = FieldSettings::default();
        self.save(&settings)?;
        Ok(settings)
    }

    /// Apply a partial update to settings
    pub fn update<F>(&self, updater: F) -> Result<FieldSettings>
    where
        F: FnOnce(&mut FieldSettings),
    {
        let mut settings = self.load()?;
        updater(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    fn get_config_dir() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join(APP_DIR)
        } else if let Some(home) = dirs::home_dir() {
            home.join(".config").join(APP_DIR)
        } else {
            PathBuf::from(format!(".{APP_DIR}"))
        }
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}
