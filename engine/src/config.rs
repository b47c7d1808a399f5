use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::store::read_text_auto;

fn default_save() -> bool {
    true
}

/// What to play and where the records live.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdventureConfig {
    pub adventure: String,
    pub party: Vec<String>,
    /// Directory holding the JSON records; built-in content when absent.
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Write experience back after a victory. Ignored for built-in content.
    #[serde(default = "default_save")]
    pub save: bool,
}

impl AdventureConfig {
    pub fn new(adventure: impl Into<String>, party: Vec<String>) -> Self {
        Self {
            adventure: adventure.into(),
            party,
            data_dir: None,
            seed: None,
            save: default_save(),
        }
    }

    /// Load from `.yaml`/`.yml` or `.json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = read_text_auto(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse YAML config: {}", path.display()))?,
            "json" => serde_json::from_str(&text)
                .with_context(|| format!("failed to parse JSON config: {}", path.display()))?,
            other => bail!("unsupported config extension '{}': {}", other, path.display()),
        };
        Ok(cfg)
    }
}
