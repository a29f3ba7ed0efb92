//! Structured stack frames

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One resolved call site, innermost frames come first in a stack
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// Function name without its module path, e.g. `a` or `Error::new`
    pub name: String,
    /// Enclosing module path, empty when it could not be resolved
    pub package: String,
    /// Source file as recorded in debug info, empty when unknown
    pub file: String,
    /// Line in `file`, 0 when unknown
    pub line_number: u32,
    /// Address this frame was resolved from, 0 when not known
    #[serde(default, skip_serializing_if = "is_zero")]
    pub program_counter: usize,
}

fn is_zero(pc: &usize) -> bool {
    *pc == 0
}

/// Errors from reading the source behind a [`StackFrame`]
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame carries no file or line
    #[error("frame has no source location")]
    UnknownLocation,

    /// The source file could not be read
    #[error("failed to read {path}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file is shorter than the recorded line
    #[error("line {line} is past the end of {path}")]
    LineOutOfRange {
        /// File that was read
        path: PathBuf,
        /// Requested line
        line: u32,
    },
}

impl StackFrame {
    /// Create a frame from its parts
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        package: impl Into<String>,
        file: impl Into<String>,
        line_number: u32,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            file: file.into(),
            line_number,
            program_counter: 0,
        }
    }

    /// `package::name`, or just `name` when the package is unknown
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match (self.package.is_empty(), self.name.is_empty()) {
            (_, true) => String::new(),
            (true, false) => self.name.clone(),
            (false, false) => format!("{}::{}", self.package, self.name),
        }
    }

    /// Whether neither symbol nor location information was found
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.name.is_empty() && self.file.is_empty() && self.line_number == 0
    }

    /// Read the source line this frame points at, trimmed
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] when the frame has no location, the file is
    /// unreadable, or the line does not exist.
    pub fn source_line(&self) -> Result<String, FrameError> {
        if self.file.is_empty() || self.line_number == 0 {
            return Err(FrameError::UnknownLocation);
        }
        let path = PathBuf::from(&self.file);
        let contents = std::fs::read_to_string(&path).map_err(|source| FrameError::Io {
            path: path.clone(),
            source,
        })?;
        let index = (self.line_number - 1) as usize;
        match contents.lines().nth(index) {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(FrameError::LineOutOfRange {
                path,
                line: self.line_number,
            }),
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.qualified_name();
        if name.is_empty() {
            f.write_str("<unknown>")?;
        } else {
            f.write_str(&name)?;
        }
        write!(f, " at {}:{}", self.file, self.line_number)
    }
}
