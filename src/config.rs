//! TOML configuration for the scanner.
//!
//! Everything has a sensible default, so a config file is optional: the
//! CLI runs with `Config::default()` when no file is given.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Worker pool size. Defaults to available CPU parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Glob patterns excluded from enumeration, matched against paths
    /// relative to the scan root.
    #[serde(default = "default_exclude_globs")]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: None,
            exclude_globs: default_exclude_globs(),
            follow_symlinks: false,
        }
    }
}

fn default_exclude_globs() -> Vec<String> {
    vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ]
}

/// Load configuration, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if let Some(workers) = config.scan.workers {
        if workers == 0 {
            anyhow::bail!("scan.workers must be > 0");
        }
    }
    Ok(config)
}
