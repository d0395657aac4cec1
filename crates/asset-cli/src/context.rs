//! Project context resolution
//!
//! Turns the `--root` and `--config` options into absolute paths and loads
//! the asset configuration they point at.

use std::path::{Path, PathBuf};

use asset_core::AssetConfig;

use crate::error::{CliError, Result};

/// Configuration file looked up in the project root when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "assets.toml";

/// The project a command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl ProjectContext {
    /// Resolve the project root (default: current directory) and the config
    /// file (default: `assets.toml` in the root; relative paths are taken
    /// from the root).
    pub fn resolve(root: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let root = match root {
            Some(root) => root.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let root = dunce::canonicalize(&root).map_err(|e| {
            CliError::user(format!("project root {} is not accessible: {e}", root.display()))
        })?;

        let config_path = match config {
            Some(config) if config.is_absolute() => config.to_path_buf(),
            Some(config) => root.join(config),
            None => root.join(DEFAULT_CONFIG),
        };

        Ok(Self { root, config_path })
    }

    pub fn load_config(&self) -> Result<AssetConfig> {
        if !self.config_path.is_file() {
            return Err(CliError::user(format!(
                "no asset configuration at {}",
                self.config_path.display()
            )));
        }
        Ok(AssetConfig::load(&self.config_path)?)
    }
}
