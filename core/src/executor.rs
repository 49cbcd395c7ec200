//! Script executor
//!
//! Runs one file against the shared interpreter context and turns the
//! VM's fault indicator into an [`ExecutionOutcome`]. Nothing here is
//! fatal: a missing file and a raising script are both ordinary outcomes.

use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::interpreter::Interpreter;

/// Where a script came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptRole {
    /// Found by discovery in the library directory
    Library,
    /// The single fixed entrypoint
    Entrypoint,
}

impl fmt::Display for ScriptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptRole::Library => write!(f, "library"),
            ScriptRole::Entrypoint => write!(f, "entrypoint"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptSource {
    pub path: PathBuf,
    pub role: ScriptRole,
}

impl ScriptSource {
    pub fn library(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            role: ScriptRole::Library,
        }
    }

    pub fn entrypoint(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            role: ScriptRole::Entrypoint,
        }
    }
}

/// Result of executing one script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "diagnostic", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Loaded,
    /// The file could not be opened
    NotFound,
    /// The script raised; carries the VM's diagnostic
    Faulted(String),
}

impl ExecutionOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ExecutionOutcome::Loaded)
    }
}

/// Load and run the script at `path` against `context`
///
/// The fault indicator is cleared before returning, so the context is
/// ready for the next script whatever happened here. Definitions made
/// before a fault are not rolled back.
pub fn execute<I: Interpreter>(context: &mut I, path: &Path) -> ExecutionOutcome {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return ExecutionOutcome::NotFound,
    };
    let mut reader = BufReader::new(file);

    context.load(&mut reader, &path.display().to_string());

    let diagnostic = context.fault().map(|fault| fault.to_string());
    match diagnostic {
        Some(diagnostic) => {
            context.clear_fault();
            ExecutionOutcome::Faulted(diagnostic)
        }
        None => ExecutionOutcome::Loaded,
    }
}
