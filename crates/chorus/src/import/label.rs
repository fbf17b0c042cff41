//! External labels.

use chorus_core::{
    di::DiRecord,
    geometry::{Bounds, Point},
    semantic::SemanticElement,
};

use super::Importer;
use crate::scene::{DiagramElement, ElementRef, LabelState, SceneGraph};

/// Midpoint of the middle segment of a polyline.
fn waypoints_mid(waypoints: &[Point]) -> Point {
    let first_idx = (waypoints.len() / 2).saturating_sub(1);
    match (waypoints.get(first_idx), waypoints.get(first_idx + 1)) {
        (Some(first), Some(second)) => first.midpoint(*second),
        (Some(first), None) => *first,
        _ => Point::default(),
    }
}

impl<S: SceneGraph> Importer<'_, S> {
    /// Creates the external label of `owner` next to it, in the owner's parent.
    pub(super) fn add_label(&mut self, semantic: &SemanticElement, owner: ElementRef) -> ElementRef {
        let model = self.model;
        let name = semantic.name().unwrap_or_default();
        let owner_element = self.scene.element(owner);

        let di = owner_element.di().and_then(|id| model.di(id));
        let nominal = self.nominal_label_bounds(owner_element, di);
        let bounds = if name.is_empty() {
            nominal
        } else {
            self.text.external_label_bounds(nominal, name)
        };

        let state = LabelState {
            bounds: bounds.rounded(),
            hidden: owner_element.is_hidden() || name.is_empty(),
            target: owner,
        };
        let owner_id = owner_element.id();
        let parent = owner_element.parent();

        let label = self
            .scene
            .create(DiagramElement::new_label(owner_id, semantic.id(), state));
        self.scene.add_shape(label, parent, None);
        self.scene.element_mut(owner).set_label(label);
        label
    }

    /// Label bounds before text measurement.
    ///
    /// Persisted label bounds win. Otherwise a default-sized label is centred
    /// below a shape, or on the middle segment of a connection.
    fn nominal_label_bounds(&self, owner: &DiagramElement, di: Option<&DiRecord>) -> Bounds {
        if let Some(bounds) = di.and_then(DiRecord::label_bounds) {
            return bounds;
        }

        let mid = match (owner.waypoints(), owner.bounds()) {
            (Some(waypoints), _) => waypoints_mid(waypoints),
            (None, Some(bounds)) => Point::new(
                bounds.min_x() + bounds.width() / 2.0,
                bounds.max_y() + self.label_size.height() / 2.0,
            ),
            (None, None) => Point::default(),
        };
        mid.to_bounds(self.label_size)
    }
}
