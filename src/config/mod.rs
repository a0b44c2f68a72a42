use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, warn};

use crate::document::Rgba;

/// Overlay timing and layering configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// z-index the counter resets to when the stack goes from empty to non-empty
    pub z_baseline: i32,

    /// Delay before the frame entrance transition starts, in milliseconds
    pub entrance_delay_ms: u64,

    /// Delay before the backdrop tint fades in, in milliseconds
    pub backdrop_delay_ms: u64,

    /// Delay before a dismissed dialog leaves the layout, in milliseconds
    pub hide_delay_ms: u64,

    /// Backdrop tint applied while a dialog is shown
    pub backdrop_tint: Rgba,

    /// Cancel a dialog's pending transitions when it is toggled again
    /// before they fire
    pub cancel_stale_transitions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            z_baseline: 100,
            entrance_delay_ms: 50,
            backdrop_delay_ms: 10,
            hide_delay_ms: 300,
            backdrop_tint: Rgba::new(0, 0, 0, 0.25),
            cancel_stale_transitions: false,
        }
    }
}

impl Config {
    /// Initialize configuration from various sources
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path).await?,
            None => Self::default(),
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Candidate configuration files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.dialog-stack.json"),
            PathBuf::from("./dialog-stack.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("dialog-stack").join("config.json"));
        }

        config_paths
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    /// Load configuration from a JSON file; missing fields take defaults
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration overrides from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(baseline) = lookup("DIALOG_STACK_Z_BASELINE") {
            match baseline.parse() {
                Ok(baseline) => self.z_baseline = baseline,
                Err(e) => warn!("Ignoring DIALOG_STACK_Z_BASELINE={}: {}", baseline, e),
            }
        }

        let delays: [(&str, &mut u64); 3] = [
            ("DIALOG_STACK_ENTRANCE_DELAY", &mut self.entrance_delay_ms),
            ("DIALOG_STACK_BACKDROP_DELAY", &mut self.backdrop_delay_ms),
            ("DIALOG_STACK_HIDE_DELAY", &mut self.hide_delay_ms),
        ];
        for (key, slot) in delays {
            if let Some(value) = lookup(key) {
                match humantime::parse_duration(&value) {
                    Ok(delay) => *slot = delay.as_millis() as u64,
                    Err(e) => warn!("Ignoring {}={}: {}", key, value, e),
                }
            }
        }

        if let Some(cancel) = lookup("DIALOG_STACK_CANCEL_STALE") {
            self.cancel_stale_transitions = matches!(cancel.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn entrance_delay(&self) -> Duration {
        Duration::from_millis(self.entrance_delay_ms)
    }

    pub fn backdrop_delay(&self) -> Duration {
        Duration::from_millis(self.backdrop_delay_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.z_baseline > i32::MAX - 1_000_000 {
            return Err(anyhow::anyhow!(
                "z_baseline {} leaves no headroom for stacked dialogs",
                self.z_baseline
            ));
        }

        if !(0.0..=1.0).contains(&self.backdrop_tint.a) {
            return Err(anyhow::anyhow!("backdrop_tint alpha must be between 0.0 and 1.0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.z_baseline, 100);
        assert_eq!(config.entrance_delay(), Duration::from_millis(50));
        assert_eq!(config.backdrop_delay(), Duration::from_millis(10));
        assert_eq!(config.hide_delay(), Duration::from_millis(300));
        assert!(!config.cancel_stale_transitions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("DIALOG_STACK_Z_BASELINE", "500"),
            ("DIALOG_STACK_HIDE_DELAY", "1s"),
            ("DIALOG_STACK_ENTRANCE_DELAY", "20ms"),
            ("DIALOG_STACK_CANCEL_STALE", "TRUE"),
        ]));

        assert_eq!(config.z_baseline, 500);
        assert_eq!(config.hide_delay_ms, 1000);
        assert_eq!(config.entrance_delay_ms, 20);
        assert_eq!(config.backdrop_delay_ms, 10);
        assert!(config.cancel_stale_transitions);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("DIALOG_STACK_Z_BASELINE", "lots"),
            ("DIALOG_STACK_HIDE_DELAY", "soon"),
        ]));

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            z_baseline: i32::MAX,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            backdrop_tint: Rgba::new(0, 0, 0, 1.5),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialog-stack.json");
        std::fs::write(&path, r#"{ "hide_delay_ms": 150, "cancel_stale_transitions": true }"#).unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.hide_delay_ms, 150);
        assert!(config.cancel_stale_transitions);
        assert_eq!(config.z_baseline, 100);
    }

    #[tokio::test]
    async fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from_path(&path).await.unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
