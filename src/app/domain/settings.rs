use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::layer::LayerChoice;
use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub initial_layer: LayerChoice,

    #[serde(default = "default_user_agent")]
    pub tile_user_agent: String,

    #[serde(default = "default_tile_workers")]
    pub tile_workers: usize,

    #[serde(default = "default_tile_cache_capacity")]
    pub tile_cache_capacity: usize,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_scroll_wheel_zoom")]
    pub scroll_wheel_zoom: bool,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_user_agent() -> String {
    format!("RussiaMap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_tile_workers() -> usize {
    4
}

fn default_tile_cache_capacity() -> usize {
    256
}

fn default_http_timeout() -> u64 {
    10
}

fn default_scroll_wheel_zoom() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            initial_layer: LayerChoice::default(),
            tile_user_agent: default_user_agent(),
            tile_workers: default_tile_workers(),
            tile_cache_capacity: default_tile_cache_capacity(),
            http_timeout_secs: default_http_timeout(),
            scroll_wheel_zoom: default_scroll_wheel_zoom(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default if not exists
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<AppSettings>(&contents) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => settings,
                    Err(e) => {
                        warn!(path = %path.display(), "{}. Using defaults.", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), "Failed to parse settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist, write defaults for next time
                let default = Self::default();
                if let Err(e) = default.save_to(path) {
                    warn!(path = %path.display(), "Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_workers == 0 || self.tile_workers > 16 {
            return Err(AppError::Settings(format!(
                "tile_workers must be between 1 and 16, got {}",
                self.tile_workers
            )));
        }
        if self.tile_cache_capacity < 16 {
            return Err(AppError::Settings(format!(
                "tile_cache_capacity must be at least 16, got {}",
                self.tile_cache_capacity
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::Settings("http_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("russia-map");
        path.push("settings.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.initial_layer, LayerChoice::RasterStreet);
        assert_eq!(settings.tile_workers, 4);
        assert_eq!(settings.tile_cache_capacity, 256);
        assert_eq!(settings.http_timeout_secs, 10);
        assert!(settings.scroll_wheel_zoom);
        assert_eq!(settings.log_filter, "info");
        assert!(settings.tile_user_agent.starts_with("RussiaMap/"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{"initial_layer": "VectorOverlay"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.initial_layer, LayerChoice::VectorOverlay);
        assert_eq!(settings.tile_workers, 4);
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let settings = AppSettings {
            tile_workers: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(AppError::Settings(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            initial_layer: LayerChoice::RasterTopographic,
            tile_workers: 2,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded, AppSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn test_invalid_values_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"tile_cache_capacity": 3}"#).unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }
}
