use crate::error::config::ConfigError;
use crate::service::{DEFAULT_OVERLAY_CLASS, DEFAULT_OVERLAY_PACKAGE, ServiceTarget, VERSION_METADATA_KEY};

use common::ErrorLocation;
use models::ClientOptions;

use std::panic::Location;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "overlay.json";
const CONFIG_VERSION: u32 = 1;
const DEFAULT_CLIENT_LOG_CAPACITY: usize = 20;
const DEFAULT_SERVICE_LOG_CAPACITY: usize = 10;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_package")]
    pub package: String,
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default = "default_version_metadata_key")]
    pub version_metadata_key: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            class: default_class(),
            version_metadata_key: default_version_metadata_key(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsConfig {
    #[serde(default = "default_true")]
    pub enable_primary_surface: bool,
    #[serde(default = "default_true")]
    pub enable_secondary_capability: bool,
    #[serde(default = "default_true")]
    pub enable_prewarming: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            enable_primary_surface: true,
            enable_secondary_capability: true,
            enable_prewarming: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogConfig {
    #[serde(default = "default_client_capacity")]
    pub client_capacity: usize,
    #[serde(default = "default_service_capacity")]
    pub service_capacity: usize,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            client_capacity: DEFAULT_CLIENT_LOG_CAPACITY,
            service_capacity: DEFAULT_SERVICE_LOG_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub event_log: EventLogConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            service: ServiceConfig::default(),
            options: OptionsConfig::default(),
            event_log: EventLogConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_true() -> bool {
    true
}
fn default_package() -> String {
    DEFAULT_OVERLAY_PACKAGE.to_string()
}
fn default_class() -> String {
    DEFAULT_OVERLAY_CLASS.to_string()
}
fn default_version_metadata_key() -> String {
    VERSION_METADATA_KEY.to_string()
}
fn default_client_capacity() -> usize {
    DEFAULT_CLIENT_LOG_CAPACITY
}
fn default_service_capacity() -> usize {
    DEFAULT_SERVICE_LOG_CAPACITY
}

// ============================================
// IMPLEMENTATION
// ============================================

impl OverlayConfig {
    /// Load config from {config_dir}/overlay.json.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read overlay config: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: OverlayConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse overlay config JSON: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/overlay.json through a temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, serialization, directory
    /// creation, the write or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                    self.version
                ),
            });
        }

        for (field, value) in [
            ("service.package", &self.service.package),
            ("service.class", &self.service.class),
            (
                "service.version_metadata_key",
                &self.service.version_metadata_key,
            ),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{field} cannot be empty"),
                });
            }
        }

        if self.event_log.client_capacity == 0 || self.event_log.service_capacity == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Event log capacities must be positive (client {}, service {})",
                    self.event_log.client_capacity, self.event_log.service_capacity
                ),
            });
        }

        Ok(())
    }

    pub fn service_target(&self) -> ServiceTarget {
        ServiceTarget::new(&self.service.package, &self.service.class)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::new(
            self.options.enable_primary_surface,
            self.options.enable_secondary_capability,
            self.options.enable_prewarming,
        )
    }
}
