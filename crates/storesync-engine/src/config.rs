//! # Engine Configuration
//!
//! Configuration for the sync engine: store profile, collection wiring, and
//! reporting knobs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STORESYNC_STORE_NAME="Corner Mart"                                 │
//! │     STORESYNC_STORE_CONTACT="+91-9000000000"                           │
//! │                                                                         │
//! │  2. TOML Config File (storesync.toml, path supplied by the host app)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     StoreProfile::default(), 48h invoice window                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storesync.toml
//! [store]
//! name = "StoreSync Mart"
//! address = "123 Main St, City, State"
//! contact = "+91-9876543210"
//!
//! [reporting]
//! recent_invoice_window_hours = 48
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use storesync_core::invoice::StoreProfile;

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Reporting Settings
// =============================================================================

/// Knobs for the reporting queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingSettings {
    /// How far back the recent-invoices list reaches (hours).
    #[serde(default = "default_recent_window_hours")]
    pub recent_invoice_window_hours: i64,
}

fn default_recent_window_hours() -> i64 {
    48
}

impl Default for ReportingSettings {
    fn default() -> Self {
        ReportingSettings {
            recent_invoice_window_hours: default_recent_window_hours(),
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Store identity printed on invoices and payloads.
    #[serde(default)]
    pub store: StoreProfile,

    /// Reporting settings.
    #[serde(default)]
    pub reporting: ReportingSettings,
}

impl EngineConfig {
    /// Creates a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storesync.toml), if the path exists
    /// 3. Environment variables
    pub fn load(config_path: Option<&Path>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if load fails.
    pub fn load_or_default(config_path: Option<&Path>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: &Path) -> EngineResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(config_path, contents)?;

        info!(path = ?config_path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        if self.reporting.recent_invoice_window_hours <= 0 {
            return Err(EngineError::InvalidConfig(
                "reporting.recent_invoice_window_hours must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("STORESYNC_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Ok(address) = std::env::var("STORESYNC_STORE_ADDRESS") {
            self.store.address = address;
        }

        if let Ok(contact) = std::env::var("STORESYNC_STORE_CONTACT") {
            self.store.contact = contact;
        }

        if let Ok(hours) = std::env::var("STORESYNC_RECENT_WINDOW_HOURS") {
            if let Ok(h) = hours.parse::<i64>() {
                self.reporting.recent_invoice_window_hours = h;
            }
        }
    }
}
