//! The [`Model`] container: semantic elements in document order plus their DI plane.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::{
    di::{DiRecord, Diagram},
    error::ModelError,
    identifier::Id,
    semantic::SemanticElement,
};

/// A loaded choreography document.
///
/// Building a `Model` links every semantic element to its direct DI record: the
/// one plane record that names the element and is not a participant band. Band
/// records are left for the importer to resolve per choreography activity.
#[derive(Debug, Clone)]
pub struct Model {
    elements: IndexMap<Id, SemanticElement>,
    diagram: Diagram,
    di_by_id: HashMap<Id, usize>,
}

impl Model {
    /// Create a model from elements in document order and the diagram plane.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateElement`] when two elements share an id and
    /// [`ModelError::DuplicateDi`] when an element has two non-band DI records.
    pub fn new(elements: Vec<SemanticElement>, diagram: Diagram) -> Result<Self, ModelError> {
        let mut by_id = IndexMap::with_capacity(elements.len());
        for element in elements {
            let id = element.id();
            if by_id.insert(id, element).is_some() {
                return Err(ModelError::DuplicateElement(id));
            }
        }

        // The plane record sits at index 0, the plane's elements follow.
        let di_by_id = std::iter::once(diagram.plane())
            .chain(diagram.elements())
            .enumerate()
            .map(|(idx, record)| (record.id(), idx))
            .collect();

        let mut direct: HashMap<Id, Id> = HashMap::new();
        for record in std::iter::once(diagram.plane()).chain(diagram.elements()) {
            let Some(element) = record.bpmn_element() else {
                continue;
            };
            if record.is_band() {
                continue;
            }
            if let Some(first) = direct.insert(element, record.id()) {
                return Err(ModelError::DuplicateDi {
                    element,
                    first,
                    second: record.id(),
                });
            }
        }

        for (element_id, di_id) in direct {
            if let Some(element) = by_id.get_mut(&element_id) {
                element.set_di(di_id);
            }
        }

        debug!(
            elements_count = by_id.len(),
            di_count = diagram.elements().len();
            "Model assembled"
        );

        Ok(Self {
            elements: by_id,
            diagram,
            di_by_id,
        })
    }

    /// Look up a semantic element by id.
    pub fn element(&self, id: Id) -> Option<&SemanticElement> {
        self.elements.get(&id)
    }

    /// All semantic elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &SemanticElement> {
        self.elements.values()
    }

    /// The diagram plane and its records.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// The semantic element the plane is drawn for.
    pub fn root_element(&self) -> Option<&SemanticElement> {
        self.diagram
            .plane()
            .bpmn_element()
            .and_then(|id| self.element(id))
    }

    /// Look up any DI record (plane included) by its own id.
    pub fn di(&self, id: Id) -> Option<&DiRecord> {
        let idx = *self.di_by_id.get(&id)?;
        if idx == 0 {
            Some(self.diagram.plane())
        } else {
            self.diagram.elements().get(idx - 1)
        }
    }

    /// The direct DI record of `element`, if it has one.
    pub fn di_of(&self, element: &SemanticElement) -> Option<&DiRecord> {
        element.di().and_then(|id| self.di(id))
    }
}

/// Wire shape of a model document.
#[derive(Debug, Deserialize)]
struct RawModel {
    elements: Vec<SemanticElement>,
    diagram: Diagram,
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawModel::deserialize(deserializer)?;
        Model::new(raw.elements, raw.diagram).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Bounds, semantic::ElementKind};

    fn sample_diagram() -> Diagram {
        Diagram::new(
            DiRecord::plane(Id::new("Plane_1"), Id::new("Choreo_1")),
            vec![
                DiRecord::shape(
                    Id::new("Task_1_di"),
                    Id::new("Task_1"),
                    Bounds::from_rect(100.0, 100.0, 100.0, 80.0),
                ),
                DiRecord::band(
                    Id::new("P1_band_di"),
                    Id::new("P1"),
                    Id::new("Task_1_di"),
                    Bounds::from_rect(100.0, 100.0, 100.0, 20.0),
                ),
            ],
        )
    }

    fn sample_elements() -> Vec<SemanticElement> {
        vec![
            SemanticElement::new(Id::new("Choreo_1"), ElementKind::Choreography),
            SemanticElement::new(Id::new("P1"), ElementKind::Participant),
            SemanticElement::new(Id::new("Task_1"), ElementKind::ChoreographyTask)
                .with_parent(Id::new("Choreo_1"))
                .with_participants(vec![Id::new("P1")], Some(Id::new("P1"))),
        ]
    }

    #[test]
    fn test_links_direct_di_but_not_bands() {
        let model = Model::new(sample_elements(), sample_diagram()).unwrap();

        let task = model.element(Id::new("Task_1")).unwrap();
        assert_eq!(task.di(), Some(Id::new("Task_1_di")));

        let root = model.root_element().unwrap();
        assert_eq!(root.di(), Some(Id::new("Plane_1")));

        // Participants only have band records, which are resolved per activity.
        let participant = model.element(Id::new("P1")).unwrap();
        assert_eq!(participant.di(), None);
    }

    #[test]
    fn test_di_lookup_by_record_id() {
        let model = Model::new(sample_elements(), sample_diagram()).unwrap();

        assert!(model.di(Id::new("Plane_1")).is_some());
        assert!(model.di(Id::new("P1_band_di")).unwrap().is_band());
        assert!(model.di(Id::new("missing")).is_none());
    }

    #[test]
    fn test_elements_keep_document_order() {
        let model = Model::new(sample_elements(), sample_diagram()).unwrap();
        let ids: Vec<String> = model.elements().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["Choreo_1", "P1", "Task_1"]);
    }

    #[test]
    fn test_duplicate_element_is_rejected() {
        let mut elements = sample_elements();
        elements.push(SemanticElement::new(Id::new("P1"), ElementKind::Participant));

        let err = Model::new(elements, sample_diagram()).unwrap_err();
        assert_eq!(err, ModelError::DuplicateElement(Id::new("P1")));
    }

    #[test]
    fn test_duplicate_direct_di_is_rejected() {
        let diagram = Diagram::new(
            DiRecord::plane(Id::new("Plane_1"), Id::new("Choreo_1")),
            vec![
                DiRecord::shape(Id::new("A_di"), Id::new("Task_1"), Bounds::default()),
                DiRecord::shape(Id::new("B_di"), Id::new("Task_1"), Bounds::default()),
            ],
        );

        let err = Model::new(sample_elements(), diagram).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateDi { .. }));
    }

    #[test]
    fn test_deserialize_model() {
        let json = r#"{
            "elements": [
                {"id": "Choreo_1", "type": "bpmn:Choreography"},
                {"id": "Start_1", "type": "bpmn:StartEvent", "parent": "Choreo_1", "name": "go"}
            ],
            "diagram": {
                "plane": {"id": "Plane_1", "type": "bpmndi:BPMNPlane", "bpmnElement": "Choreo_1"},
                "elements": [
                    {"id": "Start_1_di", "type": "bpmndi:BPMNShape", "bpmnElement": "Start_1",
                     "bounds": {"x": 0, "y": 0, "width": 36, "height": 36}}
                ]
            }
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();

        let start = model.element(Id::new("Start_1")).unwrap();
        assert_eq!(start.name(), Some("go"));
        assert_eq!(
            model.di_of(start).and_then(DiRecord::bounds),
            Some(Bounds::from_rect(0.0, 0.0, 36.0, 36.0))
        );
    }
}
