// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are consistent and within valid ranges before
//! a worker pool is built from them.

use crate::{ConfigError, ConfigResult, LaeConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - At least one worker
/// - A finite, positive, non-empty fatigue multiplier range
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &LaeConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_scheduler(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "{} setting(s) rejected\n{}",
            errors.len(),
            error_messages
        )));
    }

    Ok(())
}

fn validate_scheduler(config: &LaeConfig, errors: &mut Vec<ConfigValidationError>) {
    let scheduler = &config.scheduler;

    if scheduler.workers == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "scheduler.workers".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let (min, max) = (scheduler.fatigue_min, scheduler.fatigue_max);
    if !min.is_finite() || !max.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "scheduler.fatigue_min/fatigue_max".to_string(),
            reason: format!("must be finite (got {}..{})", min, max),
        });
    } else if min <= 0.0 || min >= max {
        errors.push(ConfigValidationError::InvalidValue {
            field: "scheduler.fatigue_min/fatigue_max".to_string(),
            reason: format!("expected 0 < min < max (got {}..{})", min, max),
        });
    }
}

fn validate_logging(config: &LaeConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if level.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.level".to_string(),
        });
    } else if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }
}
