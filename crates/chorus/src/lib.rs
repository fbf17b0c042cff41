//! Chorus - import of BPMN choreography diagrams.
//!
//! Reads a semantic choreography model together with its diagram-interchange
//! (DI) geometry and builds a consistent scene of diagram elements: one shape
//! per flow node, one band per participant of every choreography activity,
//! routed connections and external labels.

pub mod config;
pub mod events;
pub mod import;
pub mod scene;
pub mod translate;

mod error;

pub use chorus_core::{di, geometry, identifier, model, semantic, text};

pub use error::{ChorusError, ImportError, ImportErrorKind};

use log::{debug, info, trace};

use chorus_core::{model::Model, text::TextMeasure};

use config::AppConfig;
use events::{EventBus, LogEventBus};
use import::{ImportSummary, Importer};
use scene::Canvas;
use translate::{Translate, Translator};

/// Builder for loading and importing choreography diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use chorus::{ImportBuilder, config::AppConfig};
///
/// let source = std::fs::read_to_string("order.json").expect("Failed to read");
///
/// let builder = ImportBuilder::new(AppConfig::default());
/// let model = builder.parse(&source).expect("Failed to parse");
/// let outcome = builder.import(&model).expect("Failed to import");
///
/// println!("{} elements", outcome.canvas().len());
/// ```
pub struct ImportBuilder {
    config: AppConfig,
    text: Box<dyn TextMeasure>,
    translator: Box<dyn Translate>,
    events: Box<dyn EventBus>,
}

impl Default for ImportBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl ImportBuilder {
    /// Create a new import builder with the given configuration.
    ///
    /// Label text is measured as configured in the `labels` section.
    pub fn new(config: AppConfig) -> Self {
        let text = config.import().labels().text_measure();
        Self {
            config,
            text,
            translator: Box::new(Translator),
            events: Box::new(LogEventBus),
        }
    }

    /// Replace the configured text measurer.
    pub fn with_text_measure(mut self, text: Box<dyn TextMeasure>) -> Self {
        self.text = text;
        self
    }

    /// Replace the message translator used for import errors.
    pub fn with_translator(mut self, translator: Box<dyn Translate>) -> Self {
        self.translator = translator;
        self
    }

    /// Replace the notification sink.
    pub fn with_event_bus(mut self, events: Box<dyn EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON model document.
    ///
    /// # Errors
    ///
    /// Returns [`ChorusError::Model`] when the document is not valid JSON, uses
    /// an unknown element type, or defines an element or DI record twice.
    pub fn parse(&self, source: &str) -> Result<Model, ChorusError> {
        info!("Parsing model");
        let model: Model = serde_json::from_str(source)?;
        debug!(elements_count = model.elements().count(); "Model parsed successfully");
        trace!(model:?; "Parsed model");
        Ok(model)
    }

    /// Import `model` into a fresh [`Canvas`].
    ///
    /// # Errors
    ///
    /// Returns [`ChorusError::Import`] for the first element that cannot be
    /// imported.
    pub fn import(&self, model: &Model) -> Result<ImportOutcome, ChorusError> {
        info!("Importing diagram");
        let mut importer = Importer::new(model, Canvas::new(), self.config.import())
            .with_text_measure(Box::new(&*self.text))
            .with_translator(Box::new(&*self.translator))
            .with_event_bus(Box::new(&*self.events));

        let summary = import::import_model(&mut importer)?;
        let canvas = importer.into_scene();

        info!(elements_count = canvas.len(); "Diagram imported successfully");
        Ok(ImportOutcome { canvas, summary })
    }
}

/// The scene built by an import pass and what went into it.
#[derive(Debug)]
pub struct ImportOutcome {
    canvas: Canvas,
    summary: ImportSummary,
}

impl ImportOutcome {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn summary(&self) -> &ImportSummary {
        &self.summary
    }

    pub fn into_parts(self) -> (Canvas, ImportSummary) {
        (self.canvas, self.summary)
    }
}
