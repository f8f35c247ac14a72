//! XDG Base Directory support.
//!
//! Resolves where chunkwise looks for its config file and where it
//! keeps vector collections by default.

use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "chunkwise";

/// Directories used by chunkwise
///
/// Resolution order (highest to lowest):
/// 1. Explicit `CHUNKWISE_*_DIR` env vars
/// 2. `XDG_*_HOME` environment variables
/// 3. XDG defaults (`~/.config`, `~/.local/share`)
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    pub fn new() -> Self {
        Self {
            config_dir: resolve("CHUNKWISE_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: resolve("CHUNKWISE_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    /// Config file path (`config.toml` in the config directory)
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default persist directory for vector collections
    pub fn default_persist_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Create the config and data directories if missing
    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Log the resolved paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
        tracing::debug!("  Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(explicit_var: &str, xdg_var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(dir) = env::var(explicit_var) {
        return PathBuf::from(dir);
    }

    if let Ok(xdg) = env::var(xdg_var) {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    for part in home_default {
        path.push(part);
    }
    path.join(APP_DIR)
}
