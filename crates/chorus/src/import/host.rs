//! Boundary event host wiring.

use chorus_core::semantic::{SemanticElement, element_to_string};

use super::Importer;
use crate::{
    error::{ImportError, ImportErrorKind},
    scene::{ElementRef, SceneGraph},
};

impl<S: SceneGraph> Importer<'_, S> {
    /// Links the boundary event `element` and the element it is attached to.
    ///
    /// Attaching the same pair again leaves the host's attacher list unchanged.
    ///
    /// # Errors
    ///
    /// [`ImportErrorKind::MissingAttachment`] when the event has no
    /// `attachedToRef`, [`ImportErrorKind::HostNotDrawn`] when the host has not
    /// been constructed.
    pub fn attach_boundary(
        &mut self,
        boundary: &SemanticElement,
        element: ElementRef,
    ) -> Result<(), ImportError> {
        let Some(host_id) = boundary.attached_to_ref() else {
            return Err(self.error(
                ImportErrorKind::MissingAttachment,
                &[("semantic", element_to_string(Some(boundary)).as_str())],
            ));
        };

        let Some(host) = self.scene.get(host_id) else {
            return Err(self.error(
                ImportErrorKind::HostNotDrawn,
                &[
                    ("element", self.describe(host_id).as_str()),
                    ("referenced", element_to_string(Some(boundary)).as_str()),
                    ("property", "attachedToRef"),
                ],
            ));
        };

        self.scene.element_mut(element).set_host(host);
        self.scene.element_mut(host).add_attacher(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chorus_core::{
        di::{DiRecord, Diagram},
        geometry::Bounds,
        identifier::Id,
        model::Model,
        semantic::ElementKind,
    };

    use super::*;
    use crate::{config::ImportConfig, scene::Canvas};

    fn model(attached_to: Option<&str>) -> Model {
        let mut boundary = SemanticElement::new(Id::new("Timer_1"), ElementKind::BoundaryEvent);
        if let Some(host) = attached_to {
            boundary = boundary.with_attached_to(Id::new(host));
        }
        let elements = vec![
            SemanticElement::new(Id::new("Process_1"), ElementKind::Process),
            SemanticElement::new(Id::new("Task_1"), ElementKind::Task),
            boundary,
        ];
        let diagram = Diagram::new(
            DiRecord::plane(Id::new("Plane_1"), Id::new("Process_1")),
            vec![
                DiRecord::shape(Id::new("Task_1_di"), Id::new("Task_1"), Bounds::from_rect(0.0, 0.0, 100.0, 80.0)),
                DiRecord::shape(Id::new("Timer_1_di"), Id::new("Timer_1"), Bounds::from_rect(82.0, 62.0, 36.0, 36.0)),
            ],
        );
        Model::new(elements, diagram).unwrap()
    }

    #[test]
    fn test_boundary_event_is_wired_both_ways() {
        let model = model(Some("Task_1"));
        let mut importer = Importer::new(&model, Canvas::new(), &ImportConfig::default());
        let root = importer.add(model.root_element().unwrap(), None).unwrap();
        let task = importer.add(model.element(Id::new("Task_1")).unwrap(), Some(root)).unwrap();

        let timer = importer.add(model.element(Id::new("Timer_1")).unwrap(), Some(root)).unwrap();

        assert_eq!(importer.scene().element(timer).host(), Some(task));
        assert_eq!(importer.scene().element(task).attachers(), Some(&[timer][..]));
    }

    #[test]
    fn test_attaching_twice_is_idempotent() {
        let model = model(Some("Task_1"));
        let mut importer = Importer::new(&model, Canvas::new(), &ImportConfig::default());
        let root = importer.add(model.root_element().unwrap(), None).unwrap();
        let task = importer.add(model.element(Id::new("Task_1")).unwrap(), Some(root)).unwrap();
        let boundary = model.element(Id::new("Timer_1")).unwrap();
        let timer = importer.add(boundary, Some(root)).unwrap();

        importer.attach_boundary(boundary, timer).unwrap();

        assert_eq!(importer.scene().element(task).attachers(), Some(&[timer][..]));
    }

    #[test]
    fn test_missing_attached_to_ref() {
        let model = model(None);
        let mut importer = Importer::new(&model, Canvas::new(), &ImportConfig::default());
        let root = importer.add(model.root_element().unwrap(), None).unwrap();

        let err = importer
            .add(model.element(Id::new("Timer_1")).unwrap(), Some(root))
            .unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::MissingAttachment);
        assert_eq!(err.message(), r#"missing <bpmn:BoundaryEvent id="Timer_1" />#attachedToRef"#);
    }

    #[test]
    fn test_host_not_yet_drawn() {
        let model = model(Some("Task_1"));
        let mut importer = Importer::new(&model, Canvas::new(), &ImportConfig::default());
        let root = importer.add(model.root_element().unwrap(), None).unwrap();

        let err = importer
            .add(model.element(Id::new("Timer_1")).unwrap(), Some(root))
            .unwrap_err();
        assert_eq!(err.kind(), ImportErrorKind::HostNotDrawn);
        assert_eq!(
            err.message(),
            r#"element <bpmn:Task id="Task_1" /> referenced by <bpmn:BoundaryEvent id="Timer_1" />#attachedToRef not yet drawn"#
        );
    }
}
