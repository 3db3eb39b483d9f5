//! Non-fatal problems found while building a forest.
//!
//! Each diagnostic is pinned to the source location of the doclet it is about,
//! so authors can jump straight to the offending JS.

use std::fmt;

use crate::parser::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: SourceLocation,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, location: SourceLocation, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Send the diagnostic to the log, tagged with its location.
    pub(crate) fn emit(&self) {
        match self.severity {
            Severity::Warning => {
                tracing::warn!(location = %self.location, "{}", self.message);
            }
            Severity::Error => {
                tracing::error!(location = %self.location, "{}", self.message);
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}
