//! Configuration types for the Chorus import pass.
//!
//! All types implement [`serde::Deserialize`] with defaults for every field,
//! so a configuration file only has to name the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`ImportConfig`] - Settings consumed by the importer.
//! - [`BandHeightPolicy`] - Height rule table for participant bands.
//! - [`LabelConfig`] - External label size and text measurement settings.
//!
//! # Example
//!
//! ```
//! # use chorus::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.import().labels().width(), 90.0);
//! ```

use serde::Deserialize;

use chorus_core::{
    geometry::Size,
    text::{FontMetrics, MonospaceMetrics, TextMeasure},
};

pub use crate::import::BandHeightPolicy;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Import configuration section.
    #[serde(default)]
    import: ImportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given import settings.
    pub fn new(import: ImportConfig) -> Self {
        Self { import }
    }

    /// Returns the import configuration.
    pub fn import(&self) -> &ImportConfig {
        &self.import
    }
}

/// Settings consumed by the importer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportConfig {
    /// Participant band heights.
    #[serde(default)]
    bands: BandHeightPolicy,

    /// External label settings.
    #[serde(default)]
    labels: LabelConfig,
}

impl ImportConfig {
    /// Creates a new [`ImportConfig`].
    ///
    /// # Arguments
    ///
    /// * `bands` - Height rule table for participant bands.
    /// * `labels` - External label size and measurement settings.
    pub fn new(bands: BandHeightPolicy, labels: LabelConfig) -> Self {
        Self { bands, labels }
    }

    pub fn bands(&self) -> &BandHeightPolicy {
        &self.bands
    }

    pub fn labels(&self) -> &LabelConfig {
        &self.labels
    }
}

/// How label text is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    /// Shape text with system fonts.
    #[default]
    Font,
    /// Fixed advance per character.
    Monospace,
}

/// External label size and text measurement settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    width: f32,
    height: f32,
    max_text_width: f32,
    font_family: String,
    font_size: f32,
    measure: MeasureKind,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            width: 90.0,
            height: 20.0,
            max_text_width: 90.0,
            font_family: "Arial".to_string(),
            font_size: 11.0,
            measure: MeasureKind::default(),
        }
    }
}

impl LabelConfig {
    /// Nominal width of an external label before text measurement.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Nominal height of an external label before text measurement.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn max_text_width(&self) -> f32 {
        self.max_text_width
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn measure(&self) -> MeasureKind {
        self.measure
    }

    /// Returns a copy using `measure` for text measurement.
    pub fn with_measure(mut self, measure: MeasureKind) -> Self {
        self.measure = measure;
        self
    }

    /// Builds the text measurer these settings describe.
    pub fn text_measure(&self) -> Box<dyn TextMeasure> {
        match self.measure {
            MeasureKind::Font => Box::new(FontMetrics::new(
                self.font_family.clone(),
                self.font_size,
                self.max_text_width,
            )),
            MeasureKind::Monospace => Box::new(self.monospace_metrics()),
        }
    }

    /// Deterministic metrics scaled to the configured font size.
    pub fn monospace_metrics(&self) -> MonospaceMetrics {
        // 11pt maps to the 6px advance and 14px line of the default metrics
        let scale = self.font_size / 11.0;
        MonospaceMetrics::new(6.0 * scale, 14.0 * scale, self.max_text_width)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_label_defaults() {
        let labels = LabelConfig::default();
        assert_approx_eq!(f32, labels.width(), 90.0);
        assert_approx_eq!(f32, labels.height(), 20.0);
        assert_approx_eq!(f32, labels.max_text_width(), 90.0);
        assert_eq!(labels.font_family(), "Arial");
        assert_eq!(labels.measure(), MeasureKind::Font);
    }

    #[test]
    fn test_default_monospace_matches_core_default() {
        let metrics = LabelConfig::default().monospace_metrics();
        assert_eq!(metrics, MonospaceMetrics::default());
    }

    #[test]
    fn test_with_measure() {
        let labels = LabelConfig::default().with_measure(MeasureKind::Monospace);
        assert_eq!(labels.measure(), MeasureKind::Monospace);
    }
}
