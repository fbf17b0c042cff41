//! Whole-model traversal in dependency order.

use log::{debug, info, warn};

use chorus_core::{
    identifier::Id,
    semantic::{ElementKind, SemanticElement},
};

use super::Importer;
use crate::{
    error::ImportError,
    scene::{ElementRef, SceneGraph},
};

/// Counts of what an import pass built and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    shapes: usize,
    bands: usize,
    connections: usize,
    skipped: Vec<Id>,
}

impl ImportSummary {
    /// Root and shapes, boundary events included.
    pub fn shapes(&self) -> usize {
        self.shapes
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn connections(&self) -> usize {
        self.connections
    }

    /// Elements left out because they have no DI record.
    pub fn skipped(&self) -> &[Id] {
        &self.skipped
    }
}

/// Whether an element without DI is expected to have none.
fn is_undrawn_kind(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Participant | ElementKind::Message | ElementKind::LaneSet
    )
}

/// The constructed parent of `element`, falling back to the root.
fn parent_of<S: SceneGraph>(
    importer: &Importer<'_, S>,
    element: &SemanticElement,
    root: Option<ElementRef>,
) -> Option<ElementRef> {
    element
        .parent()
        .and_then(|parent| importer.scene().get(parent))
        .or(root)
}

/// Imports every element of the importer's model.
///
/// The root comes first, then shapes in document order with each choreography
/// activity's bands right after it, then boundary events, then connections.
/// Elements without a DI record are skipped.
///
/// # Errors
///
/// The first [`ImportError`] aborts the pass.
pub fn import_model<S: SceneGraph>(
    importer: &mut Importer<'_, S>,
) -> Result<ImportSummary, ImportError> {
    let model = importer.model();
    let mut summary = ImportSummary::default();
    info!(elements_count = model.elements().count(); "Importing model");

    let root_semantic = model.root_element();
    let root = match root_semantic {
        Some(root) => {
            let root = importer.add(root, None)?;
            summary.shapes += 1;
            Some(root)
        }
        None => {
            warn!(plane:% = model.diagram().plane().id(); "Diagram plane names no semantic element");
            None
        }
    };
    let root_id = root_semantic.map(SemanticElement::id);

    let mut boundaries = Vec::new();
    let mut connections = Vec::new();

    for element in model.elements() {
        let kind = element.kind();
        if Some(element.id()) == root_id {
            continue;
        }
        if element.di().is_none() {
            if !is_undrawn_kind(kind) {
                warn!(element:% = element.id(), kind:% = kind; "Skipping element without DI");
                summary.skipped.push(element.id());
            }
            continue;
        }
        if kind.is_connection() {
            connections.push(element);
            continue;
        }
        if kind.is_boundary_event() {
            boundaries.push(element);
            continue;
        }

        let parent = parent_of(importer, element, root);
        let shape = importer.add(element, parent)?;
        summary.shapes += 1;

        if kind.is_choreography_activity() {
            let order = importer.band_order(element.id()).to_vec();
            for participant_id in order {
                let Some(participant) = model.element(participant_id) else {
                    warn!(
                        activity:% = element.id(),
                        participant:% = participant_id;
                        "Participant is not in the model"
                    );
                    continue;
                };
                importer.add(participant, Some(shape))?;
                summary.bands += 1;
            }
        }
    }

    debug!(
        boundaries_count = boundaries.len(),
        connections_count = connections.len();
        "Importing deferred elements"
    );

    for element in boundaries {
        let parent = parent_of(importer, element, root);
        importer.add(element, parent)?;
        summary.shapes += 1;
    }

    for element in connections {
        let parent = parent_of(importer, element, root);
        importer.add(element, parent)?;
        summary.connections += 1;
    }

    info!(
        shapes = summary.shapes,
        bands = summary.bands,
        connections = summary.connections,
        skipped = summary.skipped.len();
        "Model imported"
    );
    Ok(summary)
}
