//! In-memory [`SceneGraph`] backed by an element arena.

use std::collections::HashMap;

use log::{trace, warn};
use serde::Serialize;

use chorus_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{DiagramElement, ElementRef, ElementRegistry, ElementVariant, SceneGraph};

/// Arena of diagram elements with an id registry.
///
/// Elements are never removed, so an [`ElementRef`] handed out by a canvas stays
/// valid for the canvas' lifetime.
#[derive(Debug, Default)]
pub struct Canvas {
    elements: Vec<DiagramElement>,
    by_id: HashMap<Id, ElementRef>,
    root: Option<ElementRef>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in creation order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementRef, &DiagramElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(idx, element)| (ElementRef::new(idx), element))
    }

    /// Looks up an element by id.
    pub fn by_id(&self, id: Id) -> Option<&DiagramElement> {
        self.get(id).map(|element| self.element(element))
    }

    /// Serializable view of every element, in creation order.
    pub fn snapshot(&self) -> Vec<ElementSnapshot> {
        self.elements
            .iter()
            .map(|element| ElementSnapshot::new(self, element))
            .collect()
    }

    fn id_of(&self, element: ElementRef) -> Id {
        self.element(element).id()
    }

    fn insert(&mut self, element: ElementRef, parent: Option<ElementRef>, index: Option<usize>) {
        let parent = parent.or(self.root).filter(|parent| *parent != element);
        self.elements[element.index()].set_parent(parent);
        if let Some(parent) = parent {
            self.elements[parent.index()].insert_child(element, index);
        }
        trace!(
            element:% = self.id_of(element),
            parent:? = parent.map(|parent| self.id_of(parent).to_string()),
            index:? = index;
            "Element inserted"
        );
    }
}

impl ElementRegistry for Canvas {
    fn get(&self, id: Id) -> Option<ElementRef> {
        self.by_id.get(&id).copied()
    }
}

impl SceneGraph for Canvas {
    fn create(&mut self, element: DiagramElement) -> ElementRef {
        let element_ref = ElementRef::new(self.elements.len());
        if let Some(previous) = self.by_id.insert(element.id(), element_ref) {
            warn!(id:% = element.id(), previous:% = previous; "Element id registered twice");
        }
        self.elements.push(element);
        element_ref
    }

    fn add_shape(&mut self, element: ElementRef, parent: Option<ElementRef>, index: Option<usize>) {
        self.insert(element, parent, index);
    }

    fn add_connection(
        &mut self,
        element: ElementRef,
        parent: Option<ElementRef>,
        index: Option<usize>,
    ) {
        self.insert(element, parent, index);
    }

    fn set_root_element(&mut self, element: ElementRef) {
        self.root = Some(element);
    }

    fn root_element(&self) -> Option<ElementRef> {
        self.root
    }

    fn element(&self, element: ElementRef) -> &DiagramElement {
        &self.elements[element.index()]
    }

    fn element_mut(&mut self, element: ElementRef) -> &mut DiagramElement {
        &mut self.elements[element.index()]
    }
}

/// Flat, id-based view of one diagram element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub id: Id,
    #[serde(rename = "type")]
    pub element_type: &'static str,
    pub business_object: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub di: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub waypoints: Vec<Point>,
    pub hidden: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachers: Vec<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub band_shapes: Vec<Id>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Id>,
}

impl ElementSnapshot {
    fn new(canvas: &Canvas, element: &DiagramElement) -> Self {
        let ids = |refs: &[ElementRef]| -> Vec<Id> {
            refs.iter().map(|element| canvas.id_of(*element)).collect()
        };

        let (band_kind, message_visible) = match element.variant() {
            ElementVariant::Band(band) => (Some(band.kind.as_str()), Some(band.message_visible)),
            _ => (None, None),
        };
        let (source, target) = match element.connection() {
            Some(connection) => (
                Some(canvas.id_of(connection.source)),
                Some(canvas.id_of(connection.target)),
            ),
            None => (None, None),
        };

        Self {
            id: element.id(),
            element_type: element.element_type().as_str(),
            business_object: element.business_object(),
            di: element.di(),
            parent: element.parent().map(|parent| canvas.id_of(parent)),
            bounds: element.bounds(),
            waypoints: element.waypoints().map(<[Point]>::to_vec).unwrap_or_default(),
            hidden: element.is_hidden(),
            collapsed: element.is_collapsed(),
            band_kind,
            message_visible,
            source,
            target,
            label: element.label().map(|label| canvas.id_of(label)),
            host: element.host().map(|host| canvas.id_of(host)),
            attachers: element.attachers().map(ids).unwrap_or_default(),
            band_shapes: element.band_shapes().map(ids).unwrap_or_default(),
            children: ids(element.children()),
        }
    }
}
