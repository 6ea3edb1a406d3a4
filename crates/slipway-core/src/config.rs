//! Engine configuration.
//!
//! The platform normally constructs an [`EngineConfig`] programmatically;
//! `from_file` exists for standalone/operator use and parses the same
//! fields from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum releases retained per release name; older entries are
    /// pruned on every new attempt.
    pub history_retention: usize,
    /// Suffix appended to the workload name for the canary variant.
    pub canary_suffix: String,
    /// Label key distinguishing canary pods from stable pods.
    pub track_label_key: String,
    pub canary_track: String,
    pub stable_track: String,
    /// Label key carrying the release name on managed pods.
    pub release_label_key: String,
    /// When true, workload validation failures are raised as structured
    /// errors; when false they are reported as a rejected outcome.
    pub strict_validation_errors: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_retention: 10,
            canary_suffix: "-canary".to_string(),
            track_label_key: "track".to_string(),
            canary_track: "canary".to_string(),
            stable_track: "stable".to_string(),
            release_label_key: "release".to_string(),
            strict_validation_errors: false,
        }
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.history_retention, 10);
        assert_eq!(config.canary_suffix, "-canary");
        assert_eq!(config.track_label_key, "track");
        assert!(!config.strict_validation_errors);
    }

    #[test]
    fn parse_partial_overrides() {
        let toml_str = r#"
history_retention = 3
canary_suffix = "-preview"
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.history_retention, 3);
        assert_eq!(config.canary_suffix, "-preview");
        // Unspecified fields keep their defaults.
        assert_eq!(config.canary_track, "canary");
    }

    #[test]
    fn roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slipway.toml");

        let mut config = EngineConfig::default();
        config.history_retention = 5;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.history_retention, 5);
        assert_eq!(loaded.canary_suffix, "-canary");
    }
}
