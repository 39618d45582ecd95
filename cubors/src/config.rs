//! Configuration for the query core.
//!
//! TOML-based, with struct-level `#[serde(default)]` so a partial file (or no
//! file at all) yields working defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CuboConfig {
    pub query: QueryConfig,
    pub legacy: LegacyConfig,
}

/// Query execution limits. Timeout and byte budget are enforced at the
/// executor boundary, not by the compiler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Query timeout in milliseconds.
    pub timeout_ms: u64,
    /// Row limit applied when the request does not carry one.
    pub default_row_limit: u32,
    /// Hard cap on any requested row limit.
    pub max_row_limit: u32,
    /// Reject queries whose estimated scanned bytes exceed this budget.
    pub max_scanned_bytes: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            timeout_ms: 30_000,
            default_row_limit: 100,
            max_row_limit: 1_000,
            max_scanned_bytes: 1_073_741_824,
        }
    }
}

/// Dataset-specific constants that are configuration, not algorithm.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Headcount assumed for periods predating the first snapshot.
    /// Substituted into metric expressions via `{fallback_headcount}`.
    pub fallback_headcount: u64,
}

impl CuboConfig {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
