// =============================================================================
// CONFIGURATION - Load settings from config.toml
// =============================================================================
//
// This module handles loading and parsing configuration from config.toml.
// Provides sensible defaults if config file is missing or has errors.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub vulkan: VulkanConfig,
    pub debug: DebugConfig,
}

/// Window settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vulkan".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Application identity reported to the Vulkan driver
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VulkanConfig {
    pub app_name: String,
    pub engine_name: String,
}

impl Default for VulkanConfig {
    fn default() -> Self {
        Self {
            app_name: "Hello Triangle".to_string(),
            engine_name: "No Engine".to_string(),
        }
    }
}

/// Debug settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub validation_layers: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            validation_layers: true,
        }
    }
}

impl DebugConfig {
    /// Effective validation switch: requested by config AND compiled with
    /// debug assertions. Release builds never enable validation layers.
    pub fn validation_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.validation_layers
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if not found
    pub fn load() -> Self {
        Self::load_from_path("config.toml").unwrap_or_else(|e| {
            log::warn!("Failed to load config.toml: {}. Using defaults.", e);
            Config::default()
        })
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        log::info!("Loaded configuration from {:?}", path);
        log::debug!("Config: {:?}", config);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.window.title, "Vulkan");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.vulkan.app_name, "Hello Triangle");
        assert_eq!(config.vulkan.engine_name, "No Engine");
        assert!(config.debug.validation_layers);
    }

    #[test]
    fn partial_file_fills_gaps_with_defaults() {
        let config: Config = toml::from_str("[window]\nwidth = 1024\n").unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.vulkan.engine_name, "No Engine");
        assert!(config.debug.validation_layers);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_from_path("does/not/exist/config.toml").unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.title, "Vulkan");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(toml::from_str::<Config>("window = 3").is_err());
    }

    #[test]
    fn effective_validation_tracks_build_profile() {
        let requested = DebugConfig {
            validation_layers: true,
        };
        assert_eq!(requested.validation_enabled(), cfg!(debug_assertions));

        let disabled = DebugConfig {
            validation_layers: false,
        };
        assert!(!disabled.validation_enabled());
    }
}
