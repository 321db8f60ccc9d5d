//! Filesystem locations Gant reads
//!
//! ```text
//! ~/.gant/
//! └── config.toml          # User defaults
//!
//! project/
//! ├── build.gant           # Default Gantfile
//! └── gant.toml            # Project defaults, override the user file
//! ```

use std::path::{Path, PathBuf};

/// Gantfile name used when none is given
pub const DEFAULT_GANTFILE: &str = crate::host::DEFAULT_GANTFILE;

/// Project configuration filename
pub const PROJECT_CONFIG: &str = "gant.toml";

/// Global config directory name
const GLOBAL_DIR: &str = ".gant";

/// Global config filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Get the global gant directory.
///
/// Returns `~/.gant/`.
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(GLOBAL_DIR)
}

/// Get the global config file path.
///
/// Returns `~/.gant/config.toml`.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(GLOBAL_CONFIG_FILE)
}

/// Get the project config file path under `base_dir`.
#[must_use]
pub fn project_config(base_dir: &Path) -> PathBuf {
    base_dir.join(PROJECT_CONFIG)
}
