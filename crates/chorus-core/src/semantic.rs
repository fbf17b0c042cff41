//! Semantic model types for choreography diagrams.
//!
//! The semantic model is the business side of a BPMN document: participants,
//! choreography activities, messages and the flows between them. It is owned by
//! the [`Model`](crate::model::Model) and treated as read-only by the import pass.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ModelError, identifier::Id};

/// The BPMN element types the importer distinguishes.
///
/// Parsed from and rendered as the `bpmn:`-prefixed type tag, e.g.
/// `bpmn:ChoreographyTask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementKind {
    Choreography,
    Collaboration,
    Process,
    Participant,
    LaneSet,
    Lane,
    ChoreographyTask,
    SubChoreography,
    CallChoreography,
    Task,
    SubProcess,
    StartEvent,
    EndEvent,
    IntermediateCatchEvent,
    IntermediateThrowEvent,
    BoundaryEvent,
    ExclusiveGateway,
    InclusiveGateway,
    ParallelGateway,
    EventBasedGateway,
    ComplexGateway,
    SequenceFlow,
    MessageFlow,
    Association,
    DataInputAssociation,
    DataOutputAssociation,
    DataObjectReference,
    DataStoreReference,
    DataInput,
    DataOutput,
    TextAnnotation,
    Group,
    Message,
}

impl ElementKind {
    /// Returns the BPMN type tag, e.g. `bpmn:ChoreographyTask`.
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::Choreography => "bpmn:Choreography",
            Self::Collaboration => "bpmn:Collaboration",
            Self::Process => "bpmn:Process",
            Self::Participant => "bpmn:Participant",
            Self::LaneSet => "bpmn:LaneSet",
            Self::Lane => "bpmn:Lane",
            Self::ChoreographyTask => "bpmn:ChoreographyTask",
            Self::SubChoreography => "bpmn:SubChoreography",
            Self::CallChoreography => "bpmn:CallChoreography",
            Self::Task => "bpmn:Task",
            Self::SubProcess => "bpmn:SubProcess",
            Self::StartEvent => "bpmn:StartEvent",
            Self::EndEvent => "bpmn:EndEvent",
            Self::IntermediateCatchEvent => "bpmn:IntermediateCatchEvent",
            Self::IntermediateThrowEvent => "bpmn:IntermediateThrowEvent",
            Self::BoundaryEvent => "bpmn:BoundaryEvent",
            Self::ExclusiveGateway => "bpmn:ExclusiveGateway",
            Self::InclusiveGateway => "bpmn:InclusiveGateway",
            Self::ParallelGateway => "bpmn:ParallelGateway",
            Self::EventBasedGateway => "bpmn:EventBasedGateway",
            Self::ComplexGateway => "bpmn:ComplexGateway",
            Self::SequenceFlow => "bpmn:SequenceFlow",
            Self::MessageFlow => "bpmn:MessageFlow",
            Self::Association => "bpmn:Association",
            Self::DataInputAssociation => "bpmn:DataInputAssociation",
            Self::DataOutputAssociation => "bpmn:DataOutputAssociation",
            Self::DataObjectReference => "bpmn:DataObjectReference",
            Self::DataStoreReference => "bpmn:DataStoreReference",
            Self::DataInput => "bpmn:DataInput",
            Self::DataOutput => "bpmn:DataOutput",
            Self::TextAnnotation => "bpmn:TextAnnotation",
            Self::Group => "bpmn:Group",
            Self::Message => "bpmn:Message",
        }
    }

    /// Choreography tasks, sub-choreographies and call choreographies.
    pub fn is_choreography_activity(self) -> bool {
        matches!(
            self,
            Self::ChoreographyTask | Self::SubChoreography | Self::CallChoreography
        )
    }

    /// Only choreography tasks can show their messages next to the bands.
    pub fn supports_message_visibility(self) -> bool {
        self == Self::ChoreographyTask
    }

    pub fn is_boundary_event(self) -> bool {
        self == Self::BoundaryEvent
    }

    pub fn is_lane(self) -> bool {
        self == Self::Lane
    }

    pub fn is_sequence_flow(self) -> bool {
        self == Self::SequenceFlow
    }

    pub fn is_data_association(self) -> bool {
        matches!(
            self,
            Self::DataInputAssociation | Self::DataOutputAssociation
        )
    }

    pub fn is_data_store_reference(self) -> bool {
        self == Self::DataStoreReference
    }

    /// Element types that are drawn as connections between two other elements.
    pub fn is_connection(self) -> bool {
        matches!(
            self,
            Self::SequenceFlow
                | Self::MessageFlow
                | Self::Association
                | Self::DataInputAssociation
                | Self::DataOutputAssociation
        )
    }

    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::StartEvent
                | Self::EndEvent
                | Self::IntermediateCatchEvent
                | Self::IntermediateThrowEvent
                | Self::BoundaryEvent
        )
    }

    pub fn is_gateway(self) -> bool {
        matches!(
            self,
            Self::ExclusiveGateway
                | Self::InclusiveGateway
                | Self::ParallelGateway
                | Self::EventBasedGateway
                | Self::ComplexGateway
        )
    }

    /// Whether the element's name is rendered as a separate label element
    /// rather than inside its own shape.
    pub fn has_external_label(self) -> bool {
        self.is_event()
            || self.is_gateway()
            || matches!(
                self,
                Self::DataObjectReference
                    | Self::DataStoreReference
                    | Self::DataInput
                    | Self::DataOutput
                    | Self::SequenceFlow
                    | Self::MessageFlow
                    | Self::Group
            )
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

impl FromStr for ElementKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "bpmn:Choreography" => Self::Choreography,
            "bpmn:Collaboration" => Self::Collaboration,
            "bpmn:Process" => Self::Process,
            "bpmn:Participant" => Self::Participant,
            "bpmn:LaneSet" => Self::LaneSet,
            "bpmn:Lane" => Self::Lane,
            "bpmn:ChoreographyTask" => Self::ChoreographyTask,
            "bpmn:SubChoreography" => Self::SubChoreography,
            "bpmn:CallChoreography" => Self::CallChoreography,
            "bpmn:Task" => Self::Task,
            "bpmn:SubProcess" => Self::SubProcess,
            "bpmn:StartEvent" => Self::StartEvent,
            "bpmn:EndEvent" => Self::EndEvent,
            "bpmn:IntermediateCatchEvent" => Self::IntermediateCatchEvent,
            "bpmn:IntermediateThrowEvent" => Self::IntermediateThrowEvent,
            "bpmn:BoundaryEvent" => Self::BoundaryEvent,
            "bpmn:ExclusiveGateway" => Self::ExclusiveGateway,
            "bpmn:InclusiveGateway" => Self::InclusiveGateway,
            "bpmn:ParallelGateway" => Self::ParallelGateway,
            "bpmn:EventBasedGateway" => Self::EventBasedGateway,
            "bpmn:ComplexGateway" => Self::ComplexGateway,
            "bpmn:SequenceFlow" => Self::SequenceFlow,
            "bpmn:MessageFlow" => Self::MessageFlow,
            "bpmn:Association" => Self::Association,
            "bpmn:DataInputAssociation" => Self::DataInputAssociation,
            "bpmn:DataOutputAssociation" => Self::DataOutputAssociation,
            "bpmn:DataObjectReference" => Self::DataObjectReference,
            "bpmn:DataStoreReference" => Self::DataStoreReference,
            "bpmn:DataInput" => Self::DataInput,
            "bpmn:DataOutput" => Self::DataOutput,
            "bpmn:TextAnnotation" => Self::TextAnnotation,
            "bpmn:Group" => Self::Group,
            "bpmn:Message" => Self::Message,
            other => return Err(ModelError::UnknownElementType(other.to_string())),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for ElementKind {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.type_tag().to_string()
    }
}

/// A reference field that holds either one element or a list of elements.
///
/// BPMN declares `DataInputAssociation.sourceRef` as a list; every other
/// `sourceRef`/`targetRef` is a single element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    One(Id),
    Many(Vec<Id>),
}

impl Reference {
    /// The referenced element when the field holds exactly one id.
    ///
    /// List values are not a single reference, even when they contain one id.
    pub fn single(&self) -> Option<Id> {
        match self {
            Self::One(id) => Some(*id),
            Self::Many(_) => None,
        }
    }

    /// The first referenced element, whichever shape the field has.
    pub fn first(&self) -> Option<Id> {
        match self {
            Self::One(id) => Some(*id),
            Self::Many(ids) => ids.first().copied(),
        }
    }
}

impl From<Id> for Reference {
    fn from(id: Id) -> Self {
        Self::One(id)
    }
}

impl From<Vec<Id>> for Reference {
    fn from(ids: Vec<Id>) -> Self {
        Self::Many(ids)
    }
}

/// A node of the business-process model.
///
/// Only the fields the import pass reads are modeled; everything else in the
/// source document is irrelevant to diagram construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticElement {
    id: Id,
    #[serde(rename = "type")]
    kind: ElementKind,
    #[serde(default)]
    name: Option<String>,
    /// Structural parent (`$parent`), e.g. the activity owning a data association.
    #[serde(default)]
    parent: Option<Id>,
    #[serde(default)]
    participant_refs: Vec<Id>,
    #[serde(default)]
    initiating_participant_ref: Option<Id>,
    #[serde(default)]
    source_ref: Option<Reference>,
    #[serde(default)]
    target_ref: Option<Reference>,
    #[serde(default)]
    attached_to_ref: Option<Id>,
    #[serde(default)]
    is_expanded: Option<bool>,
    /// Maximum of the participant multiplicity, if declared.
    #[serde(default)]
    multiplicity: Option<u32>,
    /// Direct DI link, filled in when the element is added to a [`Model`](crate::model::Model).
    #[serde(skip)]
    di: Option<Id>,
}

impl SemanticElement {
    /// Create a new element with only an id and a type.
    pub fn new(id: Id, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            parent: None,
            participant_refs: Vec::new(),
            initiating_participant_ref: None,
            source_ref: None,
            target_ref: None,
            attached_to_ref: None,
            is_expanded: None,
            multiplicity: None,
            di: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_parent(mut self, parent: Id) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_participants(mut self, participants: Vec<Id>, initiating: Option<Id>) -> Self {
        self.participant_refs = participants;
        self.initiating_participant_ref = initiating;
        self
    }

    pub fn with_source_ref(mut self, source: impl Into<Reference>) -> Self {
        self.source_ref = Some(source.into());
        self
    }

    pub fn with_target_ref(mut self, target: impl Into<Reference>) -> Self {
        self.target_ref = Some(target.into());
        self
    }

    pub fn with_attached_to(mut self, host: Id) -> Self {
        self.attached_to_ref = Some(host);
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = Some(expanded);
        self
    }

    pub fn with_multiplicity(mut self, maximum: u32) -> Self {
        self.multiplicity = Some(maximum);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    /// Participants of a choreography activity, in declaration order.
    pub fn participant_refs(&self) -> &[Id] {
        &self.participant_refs
    }

    pub fn initiating_participant_ref(&self) -> Option<Id> {
        self.initiating_participant_ref
    }

    pub fn source_ref(&self) -> Option<&Reference> {
        self.source_ref.as_ref()
    }

    pub fn target_ref(&self) -> Option<&Reference> {
        self.target_ref.as_ref()
    }

    pub fn attached_to_ref(&self) -> Option<Id> {
        self.attached_to_ref
    }

    /// Expansion marker; elements without one are expanded.
    pub fn is_expanded(&self) -> bool {
        self.is_expanded.unwrap_or(true)
    }

    /// A participant with a multiplicity maximum above one gets a marker in its band.
    pub fn is_multi_instance(&self) -> bool {
        self.multiplicity.is_some_and(|maximum| maximum > 1)
    }

    /// The direct DI record of this element, if the model has one.
    pub fn di(&self) -> Option<Id> {
        self.di
    }

    pub(crate) fn set_di(&mut self, di: Id) {
        self.di = Some(di);
    }
}

/// Stable rendering of an optional element for diagnostics.
///
/// # Examples
///
/// ```
/// # use chorus_core::identifier::Id;
/// # use chorus_core::semantic::{element_to_string, ElementKind, SemanticElement};
/// let task = SemanticElement::new(Id::new("Task_1"), ElementKind::ChoreographyTask);
/// assert_eq!(element_to_string(Some(&task)), r#"<bpmn:ChoreographyTask id="Task_1" />"#);
/// assert_eq!(element_to_string(None), "<null>");
/// ```
pub fn element_to_string(element: Option<&SemanticElement>) -> String {
    match element {
        Some(element) => tagged(element.kind.type_tag(), Some(element.id)),
        None => "<null>".to_string(),
    }
}

/// Renders `<type id="..." />`, omitting the id attribute when there is none.
pub(crate) fn tagged(type_tag: &str, id: Option<Id>) -> String {
    match id {
        Some(id) => format!("<{type_tag} id=\"{id}\" />"),
        None => format!("<{type_tag} />"),
    }
}
