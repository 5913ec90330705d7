use crate::collision::CollisionStrategy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with a taken destination when incrementing is off.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionFallback {
    #[default]
    Skip,
    LastModifiedSuffix,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    pub dry_run: bool,
    pub use_increment: bool,
    pub use_last_modified: bool,
    pub collision_fallback: CollisionFallback,
    /// Fail a file outright when no metadata can be decoded from it.
    pub strict_metadata: bool,
}

impl RunConfig {
    pub fn collision_strategy(&self) -> CollisionStrategy {
        if self.use_increment {
            return CollisionStrategy::Increment;
        }
        match self.collision_fallback {
            CollisionFallback::Skip => CollisionStrategy::Skip,
            CollisionFallback::LastModifiedSuffix => CollisionStrategy::LastModifiedSuffix,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("ch", "sysnet", "exif-rename")
        .context("cannot determine the OS configuration directory")?;
    Ok(AppPaths {
        config_path: proj.config_dir().join("config.toml"),
    })
}

/// Loads `path` if given (it must exist), else the default location if a
/// file is there, else defaults.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let paths = app_paths()?;
            if !paths.config_path.exists() {
                return Ok(RunConfig::default());
            }
            paths.config_path
        }
    };

    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("cannot read config file: {}", config_path.display()))?;
    let config = toml::from_str::<RunConfig>(&raw)
        .with_context(|| format!("cannot parse config file: {}", config_path.display()))?;
    Ok(config)
}
