//! Error adapter for converting TrellisError to miette diagnostics.
//!
//! This module provides the bridge between the library's error type and
//! miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use trellis::TrellisError;

/// Adapter giving every [`TrellisError`] a stable diagnostic code.
pub struct ErrorAdapter<'a>(pub &'a TrellisError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TrellisError::NotFound(_) => "trellis::not_found",
            TrellisError::InvalidTransition(_) => "trellis::invalid_transition",
            TrellisError::InvariantViolation(_) => "trellis::invariant",
            TrellisError::ReadOnly(_) => "trellis::read_only",
            TrellisError::Layout(_) => "trellis::layout",
            TrellisError::Io(_) => "trellis::io",
            TrellisError::Serialization(_) => "trellis::serialization",
            TrellisError::Config(_) => "trellis::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            TrellisError::NotFound(_) => {
                "ids refer to the active diagram; `trellis show` lists them"
            }
            TrellisError::InvalidTransition(_) => {
                "pass --unrestricted to relate node types the schema does not license"
            }
            TrellisError::ReadOnly(_) => "drop --readonly to edit the topic",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
