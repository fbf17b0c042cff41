//! Error types for Chorus operations.
//!
//! [`ChorusError`] wraps everything that can go wrong between reading a model
//! and producing a scene. Import failures carry an [`ImportError`], a single
//! error type whose [`ImportErrorKind`] tells the conditions apart and whose
//! message names the offending elements.

use std::io;

use thiserror::Error;

use crate::translate::Translate;

/// The main error type for Chorus operations.
#[derive(Debug, Error)]
pub enum ChorusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Model error: {0}")]
    Model(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// The conditions that abort an import pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportErrorKind {
    /// The DI record is neither plane, shape nor edge.
    UnknownDi,
    /// The element has no DI record.
    MissingDi,
    /// A participant has no band record in a choreography activity.
    MissingBand,
    /// A boundary event has no `attachedToRef`.
    MissingAttachment,
    /// A boundary event's host has not been constructed.
    HostNotDrawn,
    /// A connection endpoint has not been constructed.
    EndpointNotDrawn,
    /// A connection endpoint reference is empty.
    EndpointNotSpecified,
}

impl ImportErrorKind {
    /// Stable kebab-case code for diagnostics.
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownDi => "unknown-di",
            Self::MissingDi => "missing-di",
            Self::MissingBand => "missing-band",
            Self::MissingAttachment => "missing-attachment",
            Self::HostNotDrawn => "host-not-drawn",
            Self::EndpointNotDrawn => "endpoint-not-drawn",
            Self::EndpointNotSpecified => "endpoint-not-specified",
        }
    }

    /// Message template handed to the translator.
    pub fn template(self) -> &'static str {
        match self {
            Self::UnknownDi => "unknown di {di} for element {semantic}",
            Self::MissingDi => "no di for element {semantic}",
            Self::MissingBand => "no participant band for {participant} in {activity}",
            Self::MissingAttachment => "missing {semantic}#attachedToRef",
            Self::HostNotDrawn | Self::EndpointNotDrawn => {
                "element {element} referenced by {referenced}#{property} not yet drawn"
            }
            Self::EndpointNotSpecified => "{semantic}#{side} Ref not specified",
        }
    }
}

/// A fatal import failure with a translated, human-readable message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ImportError {
    kind: ImportErrorKind,
    message: String,
}

impl ImportError {
    /// Formats the template of `kind` through `translator`.
    pub fn new(kind: ImportErrorKind, translator: &dyn Translate, params: &[(&str, &str)]) -> Self {
        Self {
            kind,
            message: translator.translate(kind.template(), params),
        }
    }

    pub fn kind(&self) -> ImportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
