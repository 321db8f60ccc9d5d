//! `fileset` nested elements
//!
//! A fileset selects files under a directory with comma- or space-separated
//! include and exclude patterns (`**/*.rs`), given as attributes or as
//! nested `include(name: ...)` / `exclude(name: ...)` elements.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::core::ports::{TaskError, TaskInvocation};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A resolved fileset
#[derive(Debug, Clone)]
pub struct FileSet {
    dir: PathBuf,
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl FileSet {
    /// Build a fileset from a `fileset` element, resolving `dir` against `base_dir`
    pub fn from_element(element: &TaskInvocation, base_dir: &Path) -> Result<Self, TaskError> {
        let dir = base_dir.join(element.require("dir")?);

        let mut includes = split_patterns(element.attribute("includes").as_deref());
        includes.extend(element.children_named("include").filter_map(|c| c.attribute("name")));
        let mut excludes = split_patterns(element.attribute("excludes").as_deref());
        excludes.extend(element.children_named("exclude").filter_map(|c| c.attribute("name")));

        if includes.is_empty() {
            includes.push("**".to_string());
        }

        Ok(Self {
            dir,
            includes: compile(&includes)?,
            excludes: compile(&excludes)?,
        })
    }

    /// Root directory of the fileset
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether a relative path (with `/` separators) is selected
    #[must_use]
    pub fn selects(&self, relative: &str) -> bool {
        self.includes.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS))
            && !self.excludes.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    /// Selected files, relative to [`FileSet::dir`], sorted
    pub fn files(&self) -> Result<Vec<PathBuf>, TaskError> {
        if !self.dir.is_dir() {
            return Err(TaskError::failed(
                "fileset",
                format!("{} does not exist.", self.dir.display()),
            ));
        }

        let mut selected = Vec::new();
        for entry in WalkDir::new(&self.dir).follow_links(true) {
            let entry = entry.map_err(|e| TaskError::failed("fileset", e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.dir).unwrap_or(entry.path());
            let key = relative.to_string_lossy().replace('\\', "/");
            if self.selects(&key) {
                selected.push(relative.to_path_buf());
            }
        }

        // Sort for deterministic output
        selected.sort();
        Ok(selected)
    }
}

fn split_patterns(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split([',', ' '])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| if p.ends_with('/') { format!("{p}**") } else { p.to_string() })
            .collect()
    })
    .unwrap_or_default()
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, TaskError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| TaskError::failed("fileset", format!("invalid pattern {p}: {e}")))
        })
        .collect()
}
