//! Gant build scripts
//!
//! A script is plain text in a small Groovy-flavoured language:
//!
//! ```text
//! target(name: "compile", description: "Compile everything") {
//!     depends "init"
//!     ant.mkdir(dir: "build")
//! }
//! setDefaultTarget "compile"
//! ```
//!
//! Loading a script parses it and runs its top level against a
//! [`TargetContext`], which registers the targets into the binding. Target
//! bodies are closures over the parsed statements and run later, when the
//! driver asks for them.

mod ast;
mod eval;
mod lexer;
mod parser;

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::core::models::Value;
use crate::core::services::TargetContext;
use crate::error::GantError;
use ast::{Block, Position};

/// Errors loading a script
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script text is malformed
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        /// Script label
        file: String,
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        column: usize,
        /// What the parser expected
        message: String,
    },

    /// A top-level statement failed while the script was being loaded
    #[error("{file}:{line}: {error}")]
    Evaluation {
        /// Script label
        file: String,
        /// Line of the failing statement
        line: usize,
        /// The underlying failure
        error: Box<GantError>,
    },

    /// The script file could not be read
    #[error("Cannot read {file}: {error}")]
    Io {
        /// Path as given
        file: String,
        /// The underlying failure
        error: std::io::Error,
    },
}

/// A parse failure, before it is attached to a script label
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SyntaxError {
    pub position: Position,
    pub message: String,
}

impl SyntaxError {
    fn labelled(self, file: &str) -> ScriptError {
        ScriptError::Syntax {
            file: file.to_string(),
            line: self.position.line,
            column: self.position.column,
            message: self.message,
        }
    }
}

/// A parsed script, ready to run
#[derive(Debug, Clone)]
pub struct Script {
    label: String,
    block: Block,
}

impl Script {
    /// Parse script text; `label` names the script in diagnostics
    pub fn parse(label: impl Into<String>, source: &str) -> Result<Self, ScriptError> {
        let label = label.into();
        let tokens = lexer::tokenize(source).map_err(|e| e.labelled(&label))?;
        let block = parser::parse(tokens).map_err(|e| e.labelled(&label))?;
        log::debug!("parsed {label}: {} top-level statement(s)", block.len());
        Ok(Self { label, block })
    }

    /// Read and parse a script file
    pub fn read(path: &Path) -> Result<Self, ScriptError> {
        let source = fs::read_to_string(path).map_err(|error| ScriptError::Io {
            file: path.display().to_string(),
            error,
        })?;
        Self::parse(path.display().to_string(), &source)
    }

    /// The label diagnostics refer to this script by
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the top-level statements, registering targets into the binding
    pub fn run(&self, ctx: &mut TargetContext<'_>) -> Result<Value, ScriptError> {
        let mut last = Value::Nil;
        for statement in &*self.block {
            last = eval::execute(ctx, statement).map_err(|error| ScriptError::Evaluation {
                file: self.label.clone(),
                line: statement.position.line,
                error: Box::new(error),
            })?;
        }
        Ok(last)
    }
}
