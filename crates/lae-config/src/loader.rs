// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LaeConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name searched for on disk
pub const CONFIG_FILE_NAME: &str = "lae_configuration.toml";

/// Find the LAE configuration file
///
/// Search order:
/// 1. `LAE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./lae_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("LAE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by LAE_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "LAE configuration file '{}' not found in any of these locations:\n{}\n\nSet LAE_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<LaeConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    if !config_file.exists() {
        return Err(ConfigError::FileNotFound(config_file.display().to_string()));
    }
    let content = fs::read_to_string(&config_file)?;
    let mut config: LaeConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Load configuration, falling back to built-in defaults when no file is found
///
/// An explicitly given `config_path` must exist; only the search is allowed to
/// come up empty. Overrides are applied in both cases.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<LaeConfig> {
    if config_path.is_some() {
        return load_config(config_path, cli_args);
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if env::var("LAE_CONFIG_PATH").is_err() => {
            let mut config = LaeConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `LAE_WORKERS` -> `scheduler.workers`
/// - `LAE_FATIGUE_MIN` -> `scheduler.fatigue_min`
/// - `LAE_FATIGUE_MAX` -> `scheduler.fatigue_max`
/// - `LAE_FATIGUE_SEED` -> `scheduler.seed`
/// - `LAE_LOG_LEVEL` -> `logging.level`
/// - `LAE_OUTPUT_PRETTY` -> `output.pretty`
pub fn apply_environment_overrides(config: &mut LaeConfig) {
    if let Ok(value) = env::var("LAE_WORKERS") {
        if let Ok(workers) = value.parse::<usize>() {
            config.scheduler.workers = workers;
        }
    }
    if let Ok(value) = env::var("LAE_FATIGUE_MIN") {
        if let Ok(min) = value.parse::<f64>() {
            config.scheduler.fatigue_min = min;
        }
    }
    if let Ok(value) = env::var("LAE_FATIGUE_MAX") {
        if let Ok(max) = value.parse::<f64>() {
            config.scheduler.fatigue_max = max;
        }
    }
    if let Ok(value) = env::var("LAE_FATIGUE_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.scheduler.seed = Some(seed);
        }
    }
    if let Ok(value) = env::var("LAE_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("LAE_OUTPUT_PRETTY") {
        config.output.pretty = parse_flag(&value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"workers": "8", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut LaeConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("workers") {
        if let Ok(workers) = value.parse::<usize>() {
            config.scheduler.workers = workers;
        }
    }
    if let Some(value) = cli_args.get("fatigue_seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.scheduler.seed = Some(seed);
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}

fn parse_flag(value: &str) -> bool {
    let lowered = value.to_lowercase();
    lowered == "true" || lowered == "1" || lowered == "yes"
}
