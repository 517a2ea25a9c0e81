//! Catalog configuration that loaders and front ends can serialize/deserialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How per-criterion verdicts combine into the aggregate row verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    #[default]
    And,
    Or,
}

impl FromStr for CombineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(CombineMode::And),
            "or" => Ok(CombineMode::Or),
            other => Err(format!("unknown combine mode '{}' (expected and|or)", other)),
        }
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineMode::And => f.write_str("and"),
            CombineMode::Or => f.write_str("or"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Row limit loaders use to bound pre-allocation.
    pub max_rows: usize,

    /// VizieR mirror code for web queries.
    pub mirror: String,

    /// Initial combination mode for new catalogs.
    pub combine_mode: CombineMode,

    /// Default log filter for binaries (overridden by `RUST_LOG`).
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_rows: 44_000,
            mirror: "cds".to_string(),
            combine_mode: CombineMode::And,
            log_level: "info".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `CATSEL_MAX_ROWS`: loader row limit
    /// - `CATSEL_MIRROR`: mirror code for web queries
    /// - `CATSEL_COMBINE_MODE`: `and` or `or`
    /// - `CATSEL_LOG_LEVEL`: default log filter
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("CATSEL_MAX_ROWS") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.max_rows = v;
            }
        }

        if let Some(s) = lookup("CATSEL_MIRROR") {
            if !s.trim().is_empty() {
                cfg.mirror = s.trim().to_string();
            }
        }

        if let Some(s) = lookup("CATSEL_COMBINE_MODE") {
            if let Ok(v) = s.parse::<CombineMode>() {
                cfg.combine_mode = v;
            }
        }

        if let Some(s) = lookup("CATSEL_LOG_LEVEL") {
            if !s.trim().is_empty() {
                cfg.log_level = s.trim().to_string();
            }
        }

        cfg
    }
}
