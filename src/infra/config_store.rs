// ============================================================
// Layer 6 — Config Store
// ============================================================
// Reads and writes DataConfig as pretty-printed JSON so a run's
// corpus layout and dimensions can be kept next to its model.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json crate documentation

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::config::DataConfig;

/// Load and validate a DataConfig from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<DataConfig> {
    let path = path.as_ref();

    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

    let config: DataConfig = serde_json::from_str(&json)
        .with_context(|| format!("Invalid config JSON in '{}'", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Config '{}' failed validation", path.display()))?;

    tracing::debug!("Loaded data config from '{}'", path.display());
    Ok(config)
}

/// Write a DataConfig as JSON, creating parent directories as needed.
pub fn save_config(config: &DataConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

    tracing::debug!("Saved data config to '{}'", path.display());
    Ok(())
}
