//! Analysis configuration: persistence, env overrides and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Exclusive upper bound on a rule-based speaker cue, in characters.
pub const DEFAULT_MAX_CUE_LENGTH: usize = 50;
/// Confidence assigned to every rule-based discovery.
pub const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.8;
/// Confidence assigned to manually added characters.
pub const DEFAULT_MANUAL_CONFIDENCE: f64 = 1.0;

pub const ENV_AI_ENABLED: &str = "SCRIPTSTYLIST_AI_ENABLED";
pub const ENV_MATCH_BASE_NAMES: &str = "SCRIPTSTYLIST_MATCH_BASE_NAMES";
pub const ENV_MAX_CUE_LENGTH: &str = "SCRIPTSTYLIST_MAX_CUE_LENGTH";

/// Speaker matching options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Also try the base name of a qualified name ("ANJALI" for "ANJALI (bahu)").
    #[serde(default = "default_true")]
    pub match_base_names: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_base_names: true,
        }
    }
}

/// Character discovery options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Consult the AI collaborator before the rule-based heuristic.
    #[serde(default = "default_true")]
    pub ai_enabled: bool,
    #[serde(default = "default_max_cue_length")]
    pub max_cue_length: usize,
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f64,
    #[serde(default = "default_manual_confidence")]
    pub manual_confidence: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            max_cue_length: DEFAULT_MAX_CUE_LENGTH,
            fallback_confidence: DEFAULT_FALLBACK_CONFIDENCE,
            manual_confidence: DEFAULT_MANUAL_CONFIDENCE,
        }
    }
}

/// Top-level configuration (persisted as JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StylistConfig {
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_true() -> bool {
    true
}
fn default_max_cue_length() -> usize {
    DEFAULT_MAX_CUE_LENGTH
}
fn default_fallback_confidence() -> f64 {
    DEFAULT_FALLBACK_CONFIDENCE
}
fn default_manual_confidence() -> f64 {
    DEFAULT_MANUAL_CONFIDENCE
}

impl StylistConfig {
    /// Load config from file, falling back to defaults, then apply env overrides.
    pub fn load(config_path: &Path) -> Self {
        let mut config: StylistConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| match serde_json::from_str(&s) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!("Ignoring unparseable config {}: {}", config_path.display(), e);
                    None
                }
            })
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();
        config.apply_env();
        config
    }

    /// Override fields from `SCRIPTSTYLIST_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Some(v) = env_bool(ENV_AI_ENABLED) {
            self.discovery.ai_enabled = v;
        }
        if let Some(v) = env_bool(ENV_MATCH_BASE_NAMES) {
            self.matching.match_base_names = v;
        }
        if let Some(v) = std::env::var(ENV_MAX_CUE_LENGTH)
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.discovery.max_cue_length = v;
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved config to {}", self.config_path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.discovery;
        for (label, value) in [
            ("fallback_confidence", d.fallback_confidence),
            ("manual_confidence", d.manual_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be within [0, 1], got {}",
                    label, value
                )));
            }
        }
        if d.max_cue_length == 0 {
            return Err(Error::Config("max_cue_length must be positive".into()));
        }
        Ok(())
    }
}

fn env_bool(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StylistConfig::default();
        assert!(config.matching.match_base_names);
        assert!(config.discovery.ai_enabled);
        assert_eq!(config.discovery.max_cue_length, 50);
        assert_eq!(config.discovery.fallback_confidence, 0.8);
        assert_eq!(config.discovery.manual_confidence, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: StylistConfig =
            serde_json::from_str(r#"{"discovery": {"ai_enabled": false}}"#).unwrap();
        assert!(!config.discovery.ai_enabled);
        assert_eq!(config.discovery.max_cue_length, 50);
        assert!(config.matching.match_base_names);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stylist.json");

        let mut config = StylistConfig::load(&path);
        config.discovery.fallback_confidence = 0.6;
        config.matching.match_base_names = false;
        config.save().unwrap();

        let loaded = StylistConfig::load(&path);
        assert_eq!(loaded.discovery.fallback_confidence, 0.6);
        assert!(!loaded.matching.match_base_names);
        assert_eq!(loaded.config_path, path);
    }

    #[test]
    fn test_load_garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stylist.json");
        std::fs::write(&path, "not json").unwrap();

        let config = StylistConfig::load(&path);
        assert_eq!(config.discovery.max_cue_length, DEFAULT_MAX_CUE_LENGTH);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = StylistConfig::default();
        config.discovery.fallback_confidence = 1.5;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = StylistConfig::default();
        config.discovery.max_cue_length = 0;
        assert!(config.validate().is_err());
    }
}
