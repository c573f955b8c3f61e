//! Configuration Loader
//!
//! Reads the JSON config file from an explicit path or the default locations,
//! and keeps an explicitly owned cached instance that can be reloaded.

use crate::config::settings::Config;
use crate::error::{LingxingError, Result};
use parking_lot::RwLock;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable that overrides the config location
pub const CONFIG_PATH_ENV: &str = "LINGXING_CONFIG_PATH";

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Loads [`Config`] values from disk
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the config file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading config");

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LingxingError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LingxingError::Load {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        Config::parse(&content, path)
    }

    /// Load the first config file found in the default locations
    pub fn discover() -> Result<Config> {
        match Self::get_config_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Err(LingxingError::NotFound {
                path: PathBuf::from(DEFAULT_CONFIG_FILE),
            }),
        }
    }

    /// Get list of config paths to check, in priority order
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Environment variable
        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(custom_path));
        }

        // 2. Current directory
        paths.push(PathBuf::from(DEFAULT_CONFIG_FILE));

        // 3. User config directory
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("lingxing").join(DEFAULT_CONFIG_FILE));
        }

        // 4. Home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".lingxing").join(DEFAULT_CONFIG_FILE));
        }

        paths
    }
}

/// A loaded config together with the path it came from
#[derive(Debug)]
struct Cached {
    path: PathBuf,
    config: Arc<Config>,
}

/// Cached config instance, owned by whoever needs one.
///
/// Handing out `Arc<Config>` keeps earlier instances intact across reloads.
#[derive(Debug, Default)]
pub struct ConfigStore {
    cached: RwLock<Option<Cached>>,
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached config if it was loaded from `path`, otherwise load it
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<Config>> {
        let path = path.as_ref();
        if let Some(cached) = self.cached.read().as_ref() {
            if cached.path.as_path() == path {
                return Ok(cached.config.clone());
            }
        }

        self.reload(path)
    }

    /// Load `path` and replace the cached instance.
    ///
    /// On failure the previous instance stays cached.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<Arc<Config>> {
        let path = path.as_ref();
        let config = Arc::new(ConfigLoader::load(path)?);

        *self.cached.write() = Some(Cached {
            path: path.to_path_buf(),
            config: config.clone(),
        });

        Ok(config)
    }

    /// The cached config, if any
    pub fn current(&self) -> Option<Arc<Config>> {
        self.cached.read().as_ref().map(|c| c.config.clone())
    }
}
