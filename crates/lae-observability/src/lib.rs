// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lae-observability
//!
//! Console logging for the LAE crates with per-crate debug flag support.

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known LAE crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "lae",
    "lae-config",
    "lae-memory",
    "lae-scheduling",
    "lae-graph",
    "lae-engine",
    "lae-io",
];

/// Convert a crate name (`lae-engine`) to its tracing target (`lae_engine`)
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
