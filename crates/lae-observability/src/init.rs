// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization
//!
//! Installs a console subscriber on stderr so diagnostics never mix with
//! result output.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Initialize console logging
///
/// `RUST_LOG` takes precedence when set; otherwise the filter is built from
/// `debug_flags` on top of `default_level`. Calling this more than once is
/// harmless, later calls are ignored.
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `default_level` - Level for everything not covered by a debug flag
/// * `show_target` - Include the module path in each line
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    show_target: bool,
) -> Result<()> {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid RUST_LOG directives: {}", directives))?,
        _ => {
            let filter = debug_flags.to_filter_string(default_level);
            EnvFilter::try_new(&filter)
                .with_context(|| format!("Invalid log filter: {}", filter))?
        }
    };

    // Fails only when a global subscriber is already installed (tests, embedding applications)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(show_target)
        .with_thread_names(true)
        .try_init();

    Ok(())
}

/// Initialize logging with default settings (`info`, no targets)
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_logging(debug_flags, "info", false)
}
