// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug selection
//!
//! Crates come from a repeatable `--debug <crate>` option, `--debug-all`, and
//! the comma-separated `LAE_DEBUG` environment variable. `all` selects every
//! crate in [`KNOWN_CRATES`].

use std::collections::BTreeSet;
use std::env;

use crate::{crate_target, KNOWN_CRATES};

/// Environment variable read by [`CrateDebugFlags::from_env`]
pub const DEBUG_ENV_VAR: &str = "LAE_DEBUG";

/// Crates whose events are logged at `debug` regardless of the default level
///
/// ```rust
/// use lae_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_crates(["lae-engine"]);
/// assert_eq!(flags.to_filter_string("info"), "lae_engine=debug,info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Flags for the given crate names; blank names are skipped
    pub fn from_crates<I, S>(crates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = CrateDebugFlags::default();
        for name in crates {
            flags.enable(name.as_ref());
        }
        flags
    }

    /// Flags listed in `LAE_DEBUG`; empty when it is unset
    pub fn from_env() -> Self {
        env::var(DEBUG_ENV_VAR)
            .map(|value| Self::from_crates(value.split(',')))
            .unwrap_or_default()
    }

    pub fn enable(&mut self, crate_name: &str) {
        match crate_name.trim() {
            "" => {}
            "all" => self.enable_all(),
            name => {
                self.enabled_crates.insert(name.to_string());
            }
        }
    }

    pub fn enable_all(&mut self) {
        self.enabled_crates
            .extend(KNOWN_CRATES.iter().map(|name| name.to_string()));
    }

    pub fn merge(&mut self, other: CrateDebugFlags) {
        self.enabled_crates.extend(other.enabled_crates);
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    /// Requested names that are not LAE crates (most likely typos)
    pub fn unknown_crates(&self) -> Vec<&str> {
        self.enabled_crates
            .iter()
            .map(String::as_str)
            .filter(|name| !KNOWN_CRATES.contains(name))
            .collect()
    }

    /// `EnvFilter` directives: one `target=debug` per crate, then `default_level`
    pub fn to_filter_string(&self, default_level: &str) -> String {
        self.enabled_crates
            .iter()
            .map(|name| format!("{}=debug", crate_target(name)))
            .chain(std::iter::once(default_level.to_lowercase()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selects_every_known_crate() {
        let flags = CrateDebugFlags::from_crates(["all"]);
        assert_eq!(flags.enabled_crates.len(), KNOWN_CRATES.len());
        assert!(flags.unknown_crates().is_empty());
    }

    #[test]
    fn test_blank_names_skipped() {
        let flags = CrateDebugFlags::from_crates(" lae-io, ,lae-graph".split(','));
        assert!(flags.is_enabled("lae-io"));
        assert!(flags.is_enabled("lae-graph"));
        assert_eq!(flags.enabled_crates.len(), 2);
    }

    #[test]
    fn test_unknown_crates_reported() {
        let flags = CrateDebugFlags::from_crates(["lae-engine", "lae-engien"]);
        assert_eq!(flags.unknown_crates(), vec!["lae-engien"]);
    }

    #[test]
    fn test_filter_string() {
        let mut flags = CrateDebugFlags::from_crates(["lae-scheduling"]);
        flags.merge(CrateDebugFlags::from_crates(["lae-memory"]));
        assert_eq!(
            flags.to_filter_string("INFO"),
            "lae_memory=debug,lae_scheduling=debug,info"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("warn"), "warn");
    }
}
