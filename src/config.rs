//! Configuration defaults
//!
//! Two TOML files may provide defaults for the command line: the user's
//! `~/.gant/config.toml` and the project's `gant.toml`. Project values
//! override user values key by key; flags override both.
//!
//! ```toml
//! [defaults]
//! file = "build.gant"
//! verbosity = "verbose"
//! dry_run = false
//!
//! [definitions]
//! version = "1.0"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::Verbosity;
use crate::paths;

/// Errors reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// File is not valid configuration
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Gant configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GantConfig {
    /// Command-line defaults
    #[serde(default)]
    pub defaults: Defaults,
    /// Variables bound before the script loads
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, String>,
}

/// Defaults for command-line options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Gantfile to load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Verbosity level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,
    /// Trace task calls instead of executing them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl std::str::FromStr for GantConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl GantConfig {
    /// Load the user file, then the project file under `base_dir`
    ///
    /// Missing files are skipped; unreadable or malformed ones are logged
    /// and skipped.
    #[must_use]
    pub fn load(base_dir: &Path) -> Self {
        let mut config = Self::default();
        for path in [paths::global_config(), paths::project_config(base_dir)] {
            if !path.exists() {
                continue;
            }
            match Self::read(&path) {
                Ok(layer) => config.merge(layer),
                Err(e) => log::warn!("ignoring {}: {e}", path.display()),
            }
        }
        config
    }

    /// Read one configuration file
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Overlay `other`: its set values win
    pub fn merge(&mut self, other: Self) {
        if other.defaults.file.is_some() {
            self.defaults.file = other.defaults.file;
        }
        if other.defaults.verbosity.is_some() {
            self.defaults.verbosity = other.defaults.verbosity;
        }
        if other.defaults.dry_run.is_some() {
            self.defaults.dry_run = other.defaults.dry_run;
        }
        self.definitions.extend(other.definitions);
    }

    /// Save config to `path`
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
