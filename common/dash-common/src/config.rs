//! Configuration file discovery

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config dir (`~/.config/skylily`)
pub const CONFIG_DIR_NAME: &str = "skylily";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/skylily/
///
/// Returns the path if found, None otherwise.
pub fn find_config_file(filename: &str) -> Option<PathBuf> {
    let start = std::env::current_dir().ok()?;
    find_config_file_from(&start, filename).or_else(|| {
        let global_path = dirs::config_dir()?.join(CONFIG_DIR_NAME).join(filename);
        global_path.exists().then_some(global_path)
    })
}

/// Walk up from `start` looking for `filename`
fn find_config_file_from(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    tracing::debug!("Loading config from: {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}
