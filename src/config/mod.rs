//! Configuration module for flightsearch
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Validate and install the process-wide settings. Call once at startup.
pub fn init(settings: Settings) -> Result<&'static Settings> {
    settings.validate()?;
    SETTINGS
        .try_insert(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))
}
