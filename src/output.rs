//! Output formatting for human and JSON modes
//!
//! The target listing (`gant -T`) can be rendered either as
//! human-readable text or machine-parseable JSON.

use serde::Serialize;

use crate::core::models::{DEFAULT_TARGET, TargetInfo};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Registered targets of a script
#[derive(Debug, Serialize)]
pub struct TargetListing {
    /// Targets sorted by name, `default` included
    pub targets: Vec<TargetInfo>,
    /// Description of the `default` target, if there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TargetListing {
    /// Render in the given mode
    #[must_use]
    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) -> String {
        let mut text = String::new();
        let listed = self.targets.iter().filter(|t| t.name != DEFAULT_TARGET);
        for target in listed {
            if target.description.is_empty() {
                text.push_str(&format!("gant {}\n", target.name));
            } else {
                text.push_str(&format!("gant {}  --  {}\n", target.name, target.description));
            }
        }
        if let Some(default) = &self.default {
            text.push('\n');
            text.push_str(default);
            text.push('\n');
        }
        text
    }

    fn render_json(&self) -> String {
        format!("{}\n", serde_json::to_string_pretty(self).unwrap_or_default())
    }
}
