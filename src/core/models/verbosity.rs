//! Verbosity levels
//!
//! Defines how much of the build trace reaches the console.

use serde::{Deserialize, Serialize};

/// Ordered verbosity dial, lowest to highest
///
/// A message of priority `p` is emitted only when `p <= current verbosity`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Output nothing at all
    Silent = 0,
    /// Output failures only
    ErrorsOnly = 1,
    /// Output failures and warnings
    WarningsAndErrors = 2,
    /// Output which tasks run and other normal progress
    #[default]
    Normal = 3,
    /// Output lots of information about what is going on
    Verbose = 4,
    /// Output everything
    Debug = 5,
}

impl Verbosity {
    /// All levels in ascending order
    pub const ALL: [Self; 6] = [
        Self::Silent,
        Self::ErrorsOnly,
        Self::WarningsAndErrors,
        Self::Normal,
        Self::Verbose,
        Self::Debug,
    ];

    /// Numeric priority of this level
    #[must_use]
    pub const fn priority(self) -> u8 {
        self as u8
    }

    /// Level for a numeric priority, if one exists
    #[must_use]
    pub const fn from_priority(priority: u8) -> Option<Self> {
        match priority {
            0 => Some(Self::Silent),
            1 => Some(Self::ErrorsOnly),
            2 => Some(Self::WarningsAndErrors),
            3 => Some(Self::Normal),
            4 => Some(Self::Verbose),
            5 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Whether a message of the given priority passes at this level
    #[must_use]
    pub fn admits(self, priority: Self) -> bool {
        priority != Self::Silent && priority <= self
    }

    /// The `log` filter matching this level
    #[must_use]
    pub const fn level_filter(self) -> log::LevelFilter {
        match self {
            Self::Silent => log::LevelFilter::Off,
            Self::ErrorsOnly => log::LevelFilter::Error,
            Self::WarningsAndErrors => log::LevelFilter::Warn,
            Self::Normal => log::LevelFilter::Info,
            Self::Verbose => log::LevelFilter::Debug,
            Self::Debug => log::LevelFilter::Trace,
        }
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::ErrorsOnly => write!(f, "errors_only"),
            Self::WarningsAndErrors => write!(f, "warnings_and_errors"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "silent" => Ok(Self::Silent),
            "errors_only" | "errors" => Ok(Self::ErrorsOnly),
            "warnings_and_errors" | "quiet" => Ok(Self::WarningsAndErrors),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            _ => Err(format!(
                "Invalid verbosity: {s}. Use: silent, errors_only, warnings_and_errors, \
                 normal, verbose, debug"
            )),
        }
    }
}
