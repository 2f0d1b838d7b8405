// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-config
//!
//! Settings for the `lae` tool and its worker pool.
//!
//! Values are resolved in three layers, later layers winning:
//! 1. `lae_configuration.toml` (or built-in defaults when none is found)
//! 2. `LAE_*` environment variables
//! 3. Command-line overrides
//!
//! ```toml
//! [scheduler]
//! workers = 8
//! fatigue_min = 0.5
//! fatigue_max = 1.5
//! seed = 42
//!
//! [logging]
//! level = "debug"
//!
//! [output]
//! pretty = false
//! ```
//!
//! ```rust,no_run
//! use lae_config::{load_config_or_default, validate_config};
//!
//! let config = load_config_or_default(None, None)?;
//! validate_config(&config)?;
//! assert!(config.scheduler.workers >= 1);
//! # Ok::<(), lae_config::ConfigError>(())
//! ```

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default, CONFIG_FILE_NAME,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Errors raised while locating, reading or checking configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No file at the given path, or none found by the search
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    /// One or more settings out of range; the message lists all of them
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
