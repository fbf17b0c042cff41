//! Error adapter for converting ChorusError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every error gets a
//! stable code; import errors are coded by their kind.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use chorus::{ChorusError, ImportErrorKind};

/// Adapter exposing a [`ChorusError`] as a miette diagnostic.
pub struct Reportable<'a> {
    err: &'a ChorusError,
    code: String,
}

impl<'a> Reportable<'a> {
    pub fn new(err: &'a ChorusError) -> Self {
        Self {
            err,
            code: diagnostic_code(err),
        }
    }

    /// The diagnostic code, e.g. `chorus::import::missing-di`.
    pub fn code_str(&self) -> &str {
        &self.code
    }
}

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reportable")
            .field("err", &self.err)
            .field("code", &self.code)
            .finish()
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.err)
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        help_for(self.err).map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn diagnostic_code(err: &ChorusError) -> String {
    match err {
        ChorusError::Io(_) => "chorus::io".to_string(),
        ChorusError::Model(_) => "chorus::model".to_string(),
        ChorusError::Config(_) => "chorus::config".to_string(),
        ChorusError::Import(err) => format!("chorus::import::{}", err.kind().code()),
    }
}

fn help_for(err: &ChorusError) -> Option<&'static str> {
    let ChorusError::Import(err) = err else {
        return None;
    };
    let help = match err.kind() {
        ImportErrorKind::UnknownDi => "only BPMNPlane, BPMNShape and BPMNEdge records can be drawn",
        ImportErrorKind::MissingDi => "add a BPMNShape or BPMNEdge record for the element",
        ImportErrorKind::MissingBand => {
            "add a BPMNShape with choreographyActivityShape for every participant of the activity"
        }
        ImportErrorKind::MissingAttachment => "set attachedToRef on the boundary event",
        ImportErrorKind::HostNotDrawn | ImportErrorKind::EndpointNotDrawn => {
            "the referenced element needs its own DI record"
        }
        ImportErrorKind::EndpointNotSpecified => "set both sourceRef and targetRef on the connection",
    };
    Some(help)
}

/// Convert a [`ChorusError`] into a list of reportable errors.
///
/// Import stops at the first failure, so this is always a single entry.
pub fn to_reportables(err: &ChorusError) -> Vec<Reportable<'_>> {
    vec![Reportable::new(err)]
}
