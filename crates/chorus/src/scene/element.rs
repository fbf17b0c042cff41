//! Diagram elements built by the import pass.

use std::fmt;

use serde::Serialize;

use chorus_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    semantic::{ElementKind, SemanticElement},
};

use crate::import::BandKind;

/// Handle to an element stored in a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementRef(usize);

impl ElementRef {
    /// Wraps an arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type tag of a diagram element: the BPMN type it renders, or `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Bpmn(ElementKind),
    Label,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bpmn(kind) => kind.type_tag(),
            Self::Label => "label",
        }
    }

    /// The BPMN type, `None` for labels.
    pub fn kind(self) -> Option<ElementKind> {
        match self {
            Self::Bpmn(kind) => Some(kind),
            Self::Label => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a positioned shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeState {
    pub bounds: Bounds,
    pub collapsed: bool,
    pub hidden: bool,
    /// Bands of a choreography activity in canonical order; `None` for other shapes.
    pub band_shapes: Option<Vec<ElementRef>>,
}

/// State of a participant band inside a choreography activity.
#[derive(Debug, Clone, PartialEq)]
pub struct BandState {
    pub bounds: Bounds,
    pub hidden: bool,
    pub kind: BandKind,
    pub message_visible: bool,
    /// The owning choreography activity shape.
    pub activity: ElementRef,
}

/// State of a routed connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub waypoints: Vec<Point>,
    pub hidden: bool,
    pub source: ElementRef,
    pub target: ElementRef,
}

/// State of an external label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelState {
    pub bounds: Bounds,
    pub hidden: bool,
    /// The element this label names.
    pub target: ElementRef,
}

/// The closed set of things the importer builds.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementVariant {
    Root,
    Shape(ShapeState),
    Band(BandState),
    Connection(ConnectionState),
    Label(LabelState),
}

/// A constructed visual node or edge.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElement {
    id: Id,
    element_type: ElementType,
    business_object: Id,
    di: Option<Id>,
    parent: Option<ElementRef>,
    children: Vec<ElementRef>,
    label: Option<ElementRef>,
    host: Option<ElementRef>,
    attachers: Option<Vec<ElementRef>>,
    variant: ElementVariant,
}

impl DiagramElement {
    fn new(
        id: Id,
        element_type: ElementType,
        business_object: Id,
        di: Option<Id>,
        variant: ElementVariant,
    ) -> Self {
        Self {
            id,
            element_type,
            business_object,
            di,
            parent: None,
            children: Vec::new(),
            label: None,
            host: None,
            attachers: None,
            variant,
        }
    }

    /// The invisible root container drawn for a plane.
    pub fn new_root(semantic: &SemanticElement, di: Id) -> Self {
        Self::new(
            semantic.id(),
            ElementType::Bpmn(semantic.kind()),
            semantic.id(),
            Some(di),
            ElementVariant::Root,
        )
    }

    pub fn new_shape(semantic: &SemanticElement, di: Id, state: ShapeState) -> Self {
        Self::new(
            semantic.id(),
            ElementType::Bpmn(semantic.kind()),
            semantic.id(),
            Some(di),
            ElementVariant::Shape(state),
        )
    }

    /// A participant band; `id` is unique per participant and activity.
    pub fn new_band(id: Id, participant: &SemanticElement, di: Id, state: BandState) -> Self {
        Self::new(
            id,
            ElementType::Bpmn(participant.kind()),
            participant.id(),
            Some(di),
            ElementVariant::Band(state),
        )
    }

    pub fn new_connection(semantic: &SemanticElement, di: Id, state: ConnectionState) -> Self {
        Self::new(
            semantic.id(),
            ElementType::Bpmn(semantic.kind()),
            semantic.id(),
            Some(di),
            ElementVariant::Connection(state),
        )
    }

    /// An external label named after its owner: `<owner>_label`.
    pub fn new_label(owner_id: Id, business_object: Id, state: LabelState) -> Self {
        Self::new(
            owner_id.with_suffix("_label"),
            ElementType::Label,
            business_object,
            None,
            ElementVariant::Label(state),
        )
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Id of the semantic element this was built from.
    pub fn business_object(&self) -> Id {
        self.business_object
    }

    pub fn di(&self) -> Option<Id> {
        self.di
    }

    pub fn parent(&self) -> Option<ElementRef> {
        self.parent
    }

    /// Children in sibling (render) order.
    pub fn children(&self) -> &[ElementRef] {
        &self.children
    }

    pub fn label(&self) -> Option<ElementRef> {
        self.label
    }

    /// The element a boundary event is attached to.
    pub fn host(&self) -> Option<ElementRef> {
        self.host
    }

    /// Boundary events attached to this element, `None` until the first one.
    pub fn attachers(&self) -> Option<&[ElementRef]> {
        self.attachers.as_deref()
    }

    pub fn variant(&self) -> &ElementVariant {
        &self.variant
    }

    pub fn is_root(&self) -> bool {
        matches!(self.variant, ElementVariant::Root)
    }

    /// Rectangle of shapes, bands and labels; `None` for roots and connections.
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.variant {
            ElementVariant::Shape(shape) => Some(shape.bounds),
            ElementVariant::Band(band) => Some(band.bounds),
            ElementVariant::Label(label) => Some(label.bounds),
            ElementVariant::Root | ElementVariant::Connection(_) => None,
        }
    }

    pub fn waypoints(&self) -> Option<&[Point]> {
        match &self.variant {
            ElementVariant::Connection(connection) => Some(&connection.waypoints),
            _ => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match &self.variant {
            ElementVariant::Root => false,
            ElementVariant::Shape(shape) => shape.hidden,
            ElementVariant::Band(band) => band.hidden,
            ElementVariant::Connection(connection) => connection.hidden,
            ElementVariant::Label(label) => label.hidden,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        match &self.variant {
            ElementVariant::Shape(shape) => shape.collapsed,
            _ => false,
        }
    }

    /// Band shapes of a choreography activity, `None` for everything else.
    pub fn band_shapes(&self) -> Option<&[ElementRef]> {
        match &self.variant {
            ElementVariant::Shape(shape) => shape.band_shapes.as_deref(),
            _ => None,
        }
    }

    pub fn band(&self) -> Option<&BandState> {
        match &self.variant {
            ElementVariant::Band(band) => Some(band),
            _ => None,
        }
    }

    pub fn connection(&self) -> Option<&ConnectionState> {
        match &self.variant {
            ElementVariant::Connection(connection) => Some(connection),
            _ => None,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ElementRef>) {
        self.parent = parent;
    }

    pub(crate) fn insert_child(&mut self, child: ElementRef, index: Option<usize>) {
        match index {
            Some(index) => {
                let index = index.min(self.children.len());
                self.children.insert(index, child);
            }
            None => self.children.push(child),
        }
    }

    pub(crate) fn set_label(&mut self, label: ElementRef) {
        self.label = Some(label);
    }

    pub(crate) fn set_host(&mut self, host: ElementRef) {
        self.host = Some(host);
    }

    /// Adds `attacher` unless it is already attached.
    pub(crate) fn add_attacher(&mut self, attacher: ElementRef) {
        let attachers = self.attachers.get_or_insert_with(Vec::new);
        if !attachers.contains(&attacher) {
            attachers.push(attacher);
        }
    }

    /// Inserts a band into a choreography activity's band list at `index`,
    /// clamped to the list length.
    ///
    /// Returns `false` when this element is not a choreography activity shape.
    pub(crate) fn insert_band_shape(&mut self, band: ElementRef, index: usize) -> bool {
        match &mut self.variant {
            ElementVariant::Shape(ShapeState {
                band_shapes: Some(bands),
                ..
            }) => {
                bands.insert(index.min(bands.len()), band);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_shape() -> DiagramElement {
        let semantic = SemanticElement::new(Id::new("Task_1"), ElementKind::ChoreographyTask);
        DiagramElement::new_shape(
            &semantic,
            Id::new("Task_1_di"),
            ShapeState {
                bounds: Bounds::from_rect(0.0, 0.0, 100.0, 80.0),
                collapsed: false,
                hidden: false,
                band_shapes: Some(Vec::new()),
            },
        )
    }

    #[test]
    fn test_add_attacher_is_idempotent() {
        let mut host = task_shape();
        assert_eq!(host.attachers(), None);

        host.add_attacher(ElementRef::new(3));
        host.add_attacher(ElementRef::new(3));
        host.add_attacher(ElementRef::new(4));

        assert_eq!(
            host.attachers(),
            Some(&[ElementRef::new(3), ElementRef::new(4)][..])
        );
    }

    #[test]
    fn test_insert_child_front_and_back() {
        let mut parent = task_shape();
        parent.insert_child(ElementRef::new(1), None);
        parent.insert_child(ElementRef::new(2), None);
        parent.insert_child(ElementRef::new(3), Some(0));
        parent.insert_child(ElementRef::new(4), Some(99));

        assert_eq!(
            parent.children(),
            &[
                ElementRef::new(3),
                ElementRef::new(1),
                ElementRef::new(2),
                ElementRef::new(4)
            ]
        );
    }

    #[test]
    fn test_band_shapes_only_on_activities() {
        let mut activity = task_shape();
        assert!(activity.insert_band_shape(ElementRef::new(7), 0));
        assert!(activity.insert_band_shape(ElementRef::new(9), 5));
        assert!(activity.insert_band_shape(ElementRef::new(8), 1));
        assert_eq!(
            activity.band_shapes(),
            Some(&[ElementRef::new(7), ElementRef::new(8), ElementRef::new(9)][..])
        );

        let semantic = SemanticElement::new(Id::new("Start_1"), ElementKind::StartEvent);
        let mut event = DiagramElement::new_shape(
            &semantic,
            Id::new("Start_1_di"),
            ShapeState {
                bounds: Bounds::default(),
                collapsed: false,
                hidden: false,
                band_shapes: None,
            },
        );
        assert!(!event.insert_band_shape(ElementRef::new(7), 0));
        assert_eq!(event.band_shapes(), None);
    }

    #[test]
    fn test_label_id_and_type() {
        let label = DiagramElement::new_label(
            Id::new("Flow_1"),
            Id::new("Flow_1"),
            LabelState {
                bounds: Bounds::default(),
                hidden: false,
                target: ElementRef::new(0),
            },
        );
        assert_eq!(label.id(), "Flow_1_label");
        assert_eq!(label.element_type().as_str(), "label");
        assert_eq!(label.business_object(), "Flow_1");
        assert!(label.element_type().kind().is_none());
    }
}
