//! Runtime configuration for the sandbox

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sandbox configuration, loadable from a RON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Grid height in cells
    pub rows: usize,
    /// Grid width in cells
    pub cols: usize,
    /// Fixed RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Ticks to run in headless mode
    pub ticks: u64,
    /// Demo level to load before running
    pub level: Option<String>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            cols: 100,
            seed: None,
            ticks: 200,
            level: None,
        }
    }
}

impl SandboxConfig {
    /// Load config from a RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_ron(&content)
            .with_context(|| format!("Failed to parse RON config: {}", path.display()))
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        let config = ron::from_str(content).context("Invalid sandbox config")?;
        Ok(config)
    }
}
