// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `lae_configuration.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LaeConfig {
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of persistent worker threads
    pub workers: usize,
    /// Lower bound (inclusive) of the per-worker fatigue multiplier
    pub fatigue_min: f64,
    /// Upper bound (exclusive) of the per-worker fatigue multiplier
    pub fatigue_max: f64,
    /// Fixed RNG seed for fatigue multipliers (None = nondeterministic)
    pub seed: Option<u64>,
}

impl SchedulerConfig {
    /// Default settings with an explicit worker count
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            fatigue_min: 0.5,
            fatigue_max: 1.5,
            seed: None,
        }
    }
}

/// Console logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level (trace, debug, info, warn, error)
    pub level: String,
    /// Include the event target (module path) in console output
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: false,
        }
    }
}

/// Result file and diagnostics output
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print the JSON result file
    pub pretty: bool,
    /// Print the worker utilization report after a successful run
    pub print_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            print_report: true,
        }
    }
}
