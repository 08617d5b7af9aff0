//! Configuration loading from deadfn.toml.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

/// Main configuration structure for deadfn.toml.
#[derive(Debug, Deserialize, Default)]
pub struct DeadfnConfig {
    /// Regex patterns over qualified names; matching findings are dropped
    /// from the report (the aggregation itself is never filtered).
    pub ignore: Option<Vec<String>>,
    /// Worker thread count for the TU executor. Unset means one per core.
    pub threads: Option<usize>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from deadfn.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadfnConfig>> {
    let path = root.join("deadfn.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid deadfn.toml")?;
    Ok(Some(cfg))
}

/// Compile ignore patterns, rejecting the whole set on the first bad regex
/// so a typo cannot silently stop suppressing anything.
pub fn compile_ignore_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("Invalid ignore pattern '{}'", p)))
        .collect()
}
