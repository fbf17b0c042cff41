//! Connection endpoint resolution.

use std::fmt;

use chorus_core::semantic::{ElementKind, Reference, SemanticElement, element_to_string};

use super::Importer;
use crate::{
    error::{ImportError, ImportErrorKind},
    scene::{ElementRef, SceneGraph},
};

/// End of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }

    /// The semantic property holding this end's reference.
    pub fn property(self) -> &'static str {
        match self {
            Self::Source => "sourceRef",
            Self::Target => "targetRef",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<S: SceneGraph> Importer<'_, S> {
    /// Resolves one end of `connection` to an already constructed element.
    ///
    /// Data associations are anchored to their owning activity: the source of a
    /// data output association and the target of a data input association are
    /// the connection's structural parent, whatever the reference field says.
    /// The list-valued source of a data input association resolves to its first
    /// entry.
    ///
    /// # Errors
    ///
    /// [`ImportErrorKind::EndpointNotSpecified`] when there is no reference, and
    /// [`ImportErrorKind::EndpointNotDrawn`] when the referenced element has not
    /// been constructed.
    pub fn resolve_end(
        &self,
        connection: &SemanticElement,
        side: Side,
    ) -> Result<ElementRef, ImportError> {
        let reference = match (connection.kind(), side) {
            (ElementKind::DataOutputAssociation, Side::Source)
            | (ElementKind::DataInputAssociation, Side::Target) => connection.parent(),
            (ElementKind::DataInputAssociation, Side::Source) => {
                connection.source_ref().and_then(Reference::first)
            }
            (_, Side::Source) => connection.source_ref().and_then(Reference::single),
            (_, Side::Target) => connection.target_ref().and_then(Reference::single),
        };

        let Some(reference) = reference else {
            return Err(self.error(
                ImportErrorKind::EndpointNotSpecified,
                &[
                    ("semantic", element_to_string(Some(connection)).as_str()),
                    ("side", side.as_str()),
                ],
            ));
        };

        self.scene.get(reference).ok_or_else(|| {
            self.error(
                ImportErrorKind::EndpointNotDrawn,
                &[
                    ("element", self.describe(reference).as_str()),
                    ("referenced", element_to_string(Some(connection)).as_str()),
                    ("property", side.property()),
                ],
            )
        })
    }
}
