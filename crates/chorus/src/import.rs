//! The import pass: turns semantic elements and their DI into diagram elements.
//!
//! [`Importer::add`] is the single entry point for one element. It resolves the
//! element's DI record, lays out participant bands when the element is a
//! choreography activity, classifies the DI record and builds the matching
//! [`DiagramElement`] in the scene graph. Labels, boundary hosts and the
//! `element.added` notification are wired on the way out.
//!
//! # Ordering
//!
//! `add` must be called parent-before-child, hosts before boundary events and
//! endpoints before connections. Violations are reported as
//! [`ImportErrorKind::HostNotDrawn`] or [`ImportErrorKind::EndpointNotDrawn`];
//! nothing is retried or deferred here. [`import_model`] walks a whole
//! [`Model`] in a valid order.

mod bands;
mod di_index;
mod endpoint;
mod host;
mod label;
mod walker;

pub use bands::{
    BandHeightPolicy, BandInput, BandKind, BandLayout, BandPosition, BandTraits, fit_heights,
    layout_bands, partition_index,
};
pub use di_index::DiIndex;
pub use endpoint::Side;
pub use walker::{ImportSummary, import_model};

use std::collections::HashMap;

use log::{debug, trace};

use chorus_core::{
    di::{DiKind, DiRecord},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::Model,
    semantic::{ElementKind, SemanticElement, element_to_string},
    text::TextMeasure,
};

use crate::{
    config::ImportConfig,
    error::{ImportError, ImportErrorKind},
    events::{EventBus, ImportEvent, LogEventBus},
    scene::{BandState, ConnectionState, DiagramElement, ElementRef, SceneGraph, ShapeState},
    translate::{Translate, Translator},
};

/// What a DI record turns into.
enum Construct<'a> {
    Root,
    Shape(Bounds),
    Band {
        activity: ElementRef,
        layout: BandLayout,
    },
    Connection(&'a [Point]),
}

/// Builds diagram elements for one model into a scene graph.
pub struct Importer<'a, S> {
    model: &'a Model,
    scene: S,
    di_index: DiIndex,
    /// Band layouts keyed by (activity id, participant id).
    bands: HashMap<(Id, Id), BandLayout>,
    /// Participants of each laid out activity in canonical band order.
    band_order: HashMap<Id, Vec<Id>>,
    band_policy: BandHeightPolicy,
    label_size: Size,
    text: Box<dyn TextMeasure + 'a>,
    translator: Box<dyn Translate + 'a>,
    events: Box<dyn EventBus + 'a>,
}

impl<'a, S: SceneGraph> Importer<'a, S> {
    /// Create an importer writing into `scene`.
    ///
    /// Labels are measured with deterministic monospace metrics until
    /// [`with_text_measure`](Self::with_text_measure) supplies another measurer.
    pub fn new(model: &'a Model, scene: S, config: &ImportConfig) -> Self {
        Self {
            model,
            scene,
            di_index: DiIndex::build(model.diagram()),
            bands: HashMap::new(),
            band_order: HashMap::new(),
            band_policy: *config.bands(),
            label_size: config.labels().size(),
            text: Box::new(config.labels().monospace_metrics()),
            translator: Box::new(Translator),
            events: Box::new(LogEventBus),
        }
    }

    pub fn with_text_measure(mut self, text: Box<dyn TextMeasure + 'a>) -> Self {
        self.text = text;
        self
    }

    pub fn with_translator(mut self, translator: Box<dyn Translate + 'a>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_event_bus(mut self, events: Box<dyn EventBus + 'a>) -> Self {
        self.events = events;
        self
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    /// The computed band of `participant` in the choreography activity `activity`.
    pub fn band_layout(&self, activity: Id, participant: Id) -> Option<&BandLayout> {
        self.bands.get(&(activity, participant))
    }

    /// Participants of `activity` in canonical band order.
    ///
    /// Empty until the activity's shape has been added.
    pub fn band_order(&self, activity: Id) -> &[Id] {
        self.band_order
            .get(&activity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Constructs the diagram element for `semantic` under `parent`.
    ///
    /// A participant added with a choreography activity shape as `parent` becomes
    /// that activity's band.
    ///
    /// # Errors
    ///
    /// Fails when the element has no usable DI record, when a participant has no
    /// band in the activity, or when a host or connection endpoint has not been
    /// drawn yet.
    pub fn add(
        &mut self,
        semantic: &SemanticElement,
        parent: Option<ElementRef>,
    ) -> Result<ElementRef, ImportError> {
        let kind = semantic.kind();
        let activity = parent
            .filter(|_| kind == ElementKind::Participant)
            .filter(|parent| self.is_choreography_activity(*parent));

        let di = match activity {
            Some(activity) => self.band_di(semantic, activity)?,
            None => self.direct_di(semantic)?,
        };
        trace!(element:% = semantic.id(), di:% = di.id(), kind:% = kind; "Adding element");

        if kind.is_choreography_activity() {
            if let Some(bounds) = di.bounds() {
                self.layout_activity_bands(semantic, di, bounds)?;
            }
        }

        let construct = match di.kind() {
            DiKind::Plane => Construct::Root,
            DiKind::Shape { bounds, .. } => match activity {
                Some(activity) => Construct::Band {
                    activity,
                    layout: self.stored_band(semantic, activity)?,
                },
                None => Construct::Shape(*bounds),
            },
            DiKind::Edge { waypoints } => Construct::Connection(waypoints),
            DiKind::Other { .. } => {
                return Err(self.error(
                    ImportErrorKind::UnknownDi,
                    &[
                        ("di", di.to_string().as_str()),
                        ("semantic", element_to_string(Some(semantic)).as_str()),
                    ],
                ));
            }
        };

        let element = match construct {
            Construct::Root => self.add_root(semantic, di),
            Construct::Shape(bounds) => self.add_shape(semantic, di, bounds, parent)?,
            Construct::Band { activity, layout } => self.add_band(semantic, di, activity, layout),
            Construct::Connection(waypoints) => {
                self.add_connection(semantic, di, waypoints, parent)?
            }
        };

        if kind.has_external_label() && semantic.name().is_some() {
            self.add_label(semantic, element);
        }

        let id = self.scene.element(element).id();
        debug!(id:% = id, element:% = element; "Element added");
        self.events.fire(&ImportEvent::ElementAdded { element, id });

        Ok(element)
    }

    fn add_root(&mut self, semantic: &SemanticElement, di: &DiRecord) -> ElementRef {
        let root = self.scene.create(DiagramElement::new_root(semantic, di.id()));
        self.scene.set_root_element(root);
        root
    }

    fn add_shape(
        &mut self,
        semantic: &SemanticElement,
        di: &DiRecord,
        bounds: Bounds,
        parent: Option<ElementRef>,
    ) -> Result<ElementRef, ImportError> {
        let kind = semantic.kind();
        let state = ShapeState {
            bounds: bounds.rounded(),
            collapsed: !semantic.is_expanded(),
            hidden: self.inherits_hidden(parent),
            band_shapes: kind.is_choreography_activity().then(Vec::new),
        };

        let parent = if kind.is_data_store_reference() {
            self.data_store_parent(bounds, parent)
        } else {
            parent
        };

        let element = self.scene.create(DiagramElement::new_shape(semantic, di.id(), state));
        self.scene.add_shape(element, parent, kind.is_lane().then_some(0));

        if kind.is_boundary_event() {
            self.attach_boundary(semantic, element)?;
        }
        Ok(element)
    }

    fn add_band(
        &mut self,
        participant: &SemanticElement,
        di: &DiRecord,
        activity: ElementRef,
        layout: BandLayout,
    ) -> ElementRef {
        let activity_element = self.scene.element(activity);
        let id = participant.id().joined(activity_element.id(), "_");
        let activity_id = activity_element.business_object();
        // Bands added out of order still land at their canonical position
        let position = activity_element.band_shapes().map_or(0, |bands| {
            bands
                .iter()
                .filter(|band| {
                    let other = self.scene.element(**band).business_object();
                    self.bands
                        .get(&(activity_id, other))
                        .is_some_and(|other| other.index < layout.index)
                })
                .count()
        });
        let state = BandState {
            bounds: layout.bounds.snapped(),
            hidden: activity_element.is_hidden() || activity_element.is_collapsed(),
            kind: layout.kind,
            message_visible: layout.message_visible,
            activity,
        };

        let band = self.scene.create(DiagramElement::new_band(id, participant, di.id(), state));
        self.scene.add_shape(band, Some(activity), None);
        self.scene
            .element_mut(activity)
            .insert_band_shape(band, position);
        band
    }

    fn add_connection(
        &mut self,
        semantic: &SemanticElement,
        di: &DiRecord,
        waypoints: &[Point],
        parent: Option<ElementRef>,
    ) -> Result<ElementRef, ImportError> {
        let source = self.resolve_end(semantic, Side::Source)?;
        let target = self.resolve_end(semantic, Side::Target)?;
        let kind = semantic.kind();

        let state = ConnectionState {
            waypoints: waypoints.to_vec(),
            hidden: self.inherits_hidden(parent),
            source,
            target,
        };

        let parent = if kind.is_data_association() {
            parent
                .map(|parent| self.scene.find_root(parent))
                .or(self.scene.root_element())
        } else {
            parent
        };

        let element = self
            .scene
            .create(DiagramElement::new_connection(semantic, di.id(), state));
        self.scene
            .add_connection(element, parent, kind.is_sequence_flow().then_some(0));
        Ok(element)
    }

    /// Computes and stores the bands of a choreography activity.
    fn layout_activity_bands(
        &mut self,
        activity: &SemanticElement,
        activity_di: &DiRecord,
        bounds: Bounds,
    ) -> Result<(), ImportError> {
        let model = self.model;
        let initiating = activity.initiating_participant_ref();

        let mut inputs = Vec::with_capacity(activity.participant_refs().len());
        for &participant in activity.participant_refs() {
            let band = self
                .di_index
                .band(activity_di.id(), participant)
                .and_then(|id| model.di(id))
                .ok_or_else(|| self.missing_band(participant, activity.id()))?;
            inputs.push(BandInput {
                participant,
                di: band.id(),
                current: band.bounds().unwrap_or_default(),
                traits: BandTraits {
                    initiating: initiating == Some(participant),
                    multi_instance: model
                        .element(participant)
                        .is_some_and(SemanticElement::is_multi_instance),
                },
                message_visible: band.is_message_visible(),
            });
        }

        let layouts = layout_bands(activity.kind(), bounds, inputs, &self.band_policy);
        debug!(activity:% = activity.id(), bands_count = layouts.len(); "Bands laid out");
        let order = layouts.iter().map(|layout| layout.participant).collect();
        self.band_order.insert(activity.id(), order);
        for layout in layouts {
            self.bands.insert((activity.id(), layout.participant), layout);
        }
        Ok(())
    }

    fn direct_di(&self, semantic: &SemanticElement) -> Result<&'a DiRecord, ImportError> {
        let model = self.model;
        model.di_of(semantic).ok_or_else(|| {
            self.error(
                ImportErrorKind::MissingDi,
                &[("semantic", element_to_string(Some(semantic)).as_str())],
            )
        })
    }

    fn band_di(
        &self,
        participant: &SemanticElement,
        activity: ElementRef,
    ) -> Result<&'a DiRecord, ImportError> {
        let model = self.model;
        let activity = self.scene.element(activity);
        activity
            .di()
            .and_then(|activity_di| self.di_index.band(activity_di, participant.id()))
            .and_then(|band| model.di(band))
            .ok_or_else(|| self.missing_band(participant.id(), activity.business_object()))
    }

    fn stored_band(
        &self,
        participant: &SemanticElement,
        activity: ElementRef,
    ) -> Result<BandLayout, ImportError> {
        let activity_id = self.scene.element(activity).business_object();
        self.bands
            .get(&(activity_id, participant.id()))
            .copied()
            .ok_or_else(|| self.missing_band(participant.id(), activity_id))
    }

    fn is_choreography_activity(&self, element: ElementRef) -> bool {
        self.scene
            .element(element)
            .element_type()
            .kind()
            .is_some_and(ElementKind::is_choreography_activity)
    }

    /// Children of hidden or collapsed elements are hidden.
    fn inherits_hidden(&self, parent: Option<ElementRef>) -> bool {
        parent
            .map(|parent| self.scene.element(parent))
            .is_some_and(|parent| parent.is_hidden() || parent.is_collapsed())
    }

    /// Data stores drawn outside their parent belong to the diagram root.
    fn data_store_parent(&self, bounds: Bounds, parent: Option<ElementRef>) -> Option<ElementRef> {
        let parent = parent?;
        let inside = self
            .scene
            .element(parent)
            .bounds()
            .is_some_and(|parent_bounds| parent_bounds.contains_point(bounds.center()));
        if inside {
            return Some(parent);
        }

        let root = self.scene.find_root(parent);
        debug!(root:% = self.scene.element(root).id(); "Data store outside its parent, using root");
        Some(root)
    }

    /// Stable rendering of a referenced element, which may not exist.
    fn describe(&self, id: Id) -> String {
        match self.model.element(id) {
            Some(element) => element_to_string(Some(element)),
            None => format!("<unresolved id=\"{id}\" />"),
        }
    }

    fn missing_band(&self, participant: Id, activity: Id) -> ImportError {
        self.error(
            ImportErrorKind::MissingBand,
            &[
                ("participant", self.describe(participant).as_str()),
                ("activity", self.describe(activity).as_str()),
            ],
        )
    }

    fn error(&self, kind: ImportErrorKind, params: &[(&str, &str)]) -> ImportError {
        ImportError::new(kind, &*self.translator, params)
    }
}
