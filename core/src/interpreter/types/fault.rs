//! Faults raised by running script code

use std::fmt;

/// An unhandled error left on the context by a load
///
/// Renders the way the device console shows it:
/// `/storage/main.rb:3: boom (RuntimeError)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    /// Exception class, e.g. `RuntimeError`
    pub class: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<usize>,
}

impl Fault {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Attach the source position; an already known line is kept
    pub fn at(mut self, file: &str, line: Option<usize>) -> Self {
        self.file = Some(file.to_string());
        if self.line.is_none() {
            self.line = line;
        }
        self
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}: ", file, line)?,
            (Some(file), None) => write!(f, "{}: ", file)?,
            _ => {}
        }
        write!(f, "{} ({})", self.message, self.class)
    }
}

impl std::error::Error for Fault {}
