//! Diagram-interchange (DI) records.
//!
//! A DI record holds the persisted geometry of one semantic element: a plane for
//! the diagram root, bounds for shapes and participant bands, or waypoints for
//! connections. A participant appears once per choreography activity it takes
//! part in, so several band records can point at the same participant; they are
//! told apart by [`DiKind::Shape::choreography_activity_shape`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Bounds, Point},
    identifier::Id,
    semantic::tagged,
};

/// Geometry payload of a DI record.
#[derive(Debug, Clone, PartialEq)]
pub enum DiKind {
    /// `bpmndi:BPMNPlane`, the diagram root.
    Plane,
    /// `bpmndi:BPMNShape`.
    Shape {
        bounds: Bounds,
        /// Set on participant bands: the DI record of the owning activity shape.
        choreography_activity_shape: Option<Id>,
        /// Persisted message visibility of a band, if any.
        is_message_visible: Option<bool>,
    },
    /// `bpmndi:BPMNEdge`.
    Edge { waypoints: Vec<Point> },
    /// Any other record type, kept verbatim so the importer can report it.
    Other { type_name: String },
}

impl DiKind {
    /// The DI type tag used in diagnostics.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Plane => "bpmndi:BPMNPlane",
            Self::Shape { .. } => "bpmndi:BPMNShape",
            Self::Edge { .. } => "bpmndi:BPMNEdge",
            Self::Other { type_name } => type_name,
        }
    }
}

/// Geometry and style metadata for one semantic element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDiRecord", into = "RawDiRecord")]
pub struct DiRecord {
    id: Id,
    bpmn_element: Option<Id>,
    kind: DiKind,
    label_bounds: Option<Bounds>,
}

impl DiRecord {
    pub fn new(id: Id, bpmn_element: Option<Id>, kind: DiKind) -> Self {
        Self {
            id,
            bpmn_element,
            kind,
            label_bounds: None,
        }
    }

    /// A plane record for the diagram root `element`.
    pub fn plane(id: Id, element: Id) -> Self {
        Self::new(id, Some(element), DiKind::Plane)
    }

    /// A plain shape record.
    pub fn shape(id: Id, element: Id, bounds: Bounds) -> Self {
        Self::new(
            id,
            Some(element),
            DiKind::Shape {
                bounds,
                choreography_activity_shape: None,
                is_message_visible: None,
            },
        )
    }

    /// A participant band of the activity whose shape record is `activity_shape`.
    pub fn band(id: Id, participant: Id, activity_shape: Id, bounds: Bounds) -> Self {
        Self::new(
            id,
            Some(participant),
            DiKind::Shape {
                bounds,
                choreography_activity_shape: Some(activity_shape),
                is_message_visible: None,
            },
        )
    }

    /// An edge record with waypoints in drawing order.
    pub fn edge(id: Id, element: Id, waypoints: Vec<Point>) -> Self {
        Self::new(id, Some(element), DiKind::Edge { waypoints })
    }

    pub fn with_label_bounds(mut self, bounds: Bounds) -> Self {
        self.label_bounds = Some(bounds);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// The semantic element this record describes.
    pub fn bpmn_element(&self) -> Option<Id> {
        self.bpmn_element
    }

    pub fn kind(&self) -> &DiKind {
        &self.kind
    }

    /// Shape bounds, `None` for planes, edges and unknown records.
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.kind {
            DiKind::Shape { bounds, .. } => Some(*bounds),
            _ => None,
        }
    }

    /// For participant bands, the DI id of the owning choreography activity shape.
    pub fn choreography_activity_shape(&self) -> Option<Id> {
        match &self.kind {
            DiKind::Shape {
                choreography_activity_shape,
                ..
            } => *choreography_activity_shape,
            _ => None,
        }
    }

    pub fn is_band(&self) -> bool {
        self.choreography_activity_shape().is_some()
    }

    pub fn is_message_visible(&self) -> Option<bool> {
        match &self.kind {
            DiKind::Shape {
                is_message_visible, ..
            } => *is_message_visible,
            _ => None,
        }
    }

    /// Bounds of an explicitly positioned external label.
    pub fn label_bounds(&self) -> Option<Bounds> {
        self.label_bounds
    }
}

impl fmt::Display for DiRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tagged(self.kind.type_tag(), Some(self.id)))
    }
}

/// The diagram plane: the root record plus every record drawn on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    plane: DiRecord,
    #[serde(default)]
    elements: Vec<DiRecord>,
}

impl Diagram {
    pub fn new(plane: DiRecord, elements: Vec<DiRecord>) -> Self {
        Self { plane, elements }
    }

    pub fn plane(&self) -> &DiRecord {
        &self.plane
    }

    /// Records drawn on the plane, in document order.
    pub fn elements(&self) -> &[DiRecord] {
        &self.elements
    }
}

/// Wire shape of a DI record; `type` selects the [`DiKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiRecord {
    id: Id,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bpmn_element: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    waypoints: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    choreography_activity_shape: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_message_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label_bounds: Option<Bounds>,
}

impl From<RawDiRecord> for DiRecord {
    fn from(raw: RawDiRecord) -> Self {
        let kind = match raw.type_name.as_str() {
            "bpmndi:BPMNPlane" => DiKind::Plane,
            "bpmndi:BPMNShape" => DiKind::Shape {
                bounds: raw.bounds.unwrap_or_default(),
                choreography_activity_shape: raw.choreography_activity_shape,
                is_message_visible: raw.is_message_visible,
            },
            "bpmndi:BPMNEdge" => DiKind::Edge {
                waypoints: raw.waypoints,
            },
            _ => DiKind::Other {
                type_name: raw.type_name,
            },
        };
        DiRecord {
            id: raw.id,
            bpmn_element: raw.bpmn_element,
            kind,
            label_bounds: raw.label_bounds,
        }
    }
}

impl From<DiRecord> for RawDiRecord {
    fn from(record: DiRecord) -> Self {
        let type_name = record.kind.type_tag().to_string();
        let mut raw = RawDiRecord {
            id: record.id,
            type_name,
            bpmn_element: record.bpmn_element,
            bounds: None,
            waypoints: Vec::new(),
            choreography_activity_shape: None,
            is_message_visible: None,
            label_bounds: record.label_bounds,
        };
        match record.kind {
            DiKind::Shape {
                bounds,
                choreography_activity_shape,
                is_message_visible,
            } => {
                raw.bounds = Some(bounds);
                raw.choreography_activity_shape = choreography_activity_shape;
                raw.is_message_visible = is_message_visible;
            }
            DiKind::Edge { waypoints } => raw.waypoints = waypoints,
            DiKind::Plane | DiKind::Other { .. } => {}
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_record_knows_its_activity() {
        let band = DiRecord::band(
            Id::new("P1_band"),
            Id::new("P1"),
            Id::new("Task_1_di"),
            Bounds::from_rect(0.0, 0.0, 100.0, 20.0),
        );
        assert!(band.is_band());
        assert_eq!(band.choreography_activity_shape(), Some(Id::new("Task_1_di")));
        assert_eq!(band.bpmn_element(), Some(Id::new("P1")));

        let shape = DiRecord::shape(Id::new("S_di"), Id::new("S"), Bounds::default());
        assert!(!shape.is_band());
    }

    #[test]
    fn test_display_names_type_and_id() {
        let edge = DiRecord::edge(Id::new("Flow_di"), Id::new("Flow"), Vec::new());
        assert_eq!(edge.to_string(), r#"<bpmndi:BPMNEdge id="Flow_di" />"#);
    }

    #[test]
    fn test_deserialize_known_kinds() {
        let json = r#"[
            {"id": "Plane_1", "type": "bpmndi:BPMNPlane", "bpmnElement": "Choreo_1"},
            {"id": "Task_di", "type": "bpmndi:BPMNShape", "bpmnElement": "Task_1",
             "bounds": {"x": 10, "y": 20, "width": 100, "height": 80}},
            {"id": "Band_di", "type": "bpmndi:BPMNShape", "bpmnElement": "P1",
             "bounds": {"x": 10, "y": 20, "width": 100, "height": 20},
             "choreographyActivityShape": "Task_di", "isMessageVisible": false},
            {"id": "Flow_di", "type": "bpmndi:BPMNEdge", "bpmnElement": "Flow_1",
             "waypoints": [{"x": 0, "y": 0}, {"x": 50, "y": 0}]}
        ]"#;
        let records: Vec<DiRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records[0].kind(), &DiKind::Plane);
        assert_eq!(records[1].bounds(), Some(Bounds::from_rect(10.0, 20.0, 100.0, 80.0)));
        assert_eq!(records[2].choreography_activity_shape(), Some(Id::new("Task_di")));
        assert_eq!(records[2].is_message_visible(), Some(false));
        assert_eq!(
            records[3].kind(),
            &DiKind::Edge {
                waypoints: vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)]
            }
        );
    }

    #[test]
    fn test_unknown_record_type_is_preserved() {
        let json = r#"{"id": "Style_1", "type": "bpmndi:BPMNLabelStyle", "bpmnElement": "Task_1"}"#;
        let record: DiRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            record.kind(),
            &DiKind::Other {
                type_name: "bpmndi:BPMNLabelStyle".to_string()
            }
        );
        assert_eq!(record.to_string(), r#"<bpmndi:BPMNLabelStyle id="Style_1" />"#);
    }
}
