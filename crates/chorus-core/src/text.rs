//! Text measurement for external labels.
//!
//! The importer only needs one question answered: given the nominal bounds of an
//! external label and its text, where does the rendered text actually sit? The
//! [`TextMeasure`] trait is that seam.
//!
//! - [`FontMetrics`] shapes text with real fonts through `cosmic-text`.
//! - [`MonospaceMetrics`] estimates with a fixed advance per character and is
//!   fully deterministic, which makes it the right choice in tests.

use std::sync::{Arc, Mutex};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::{Bounds, Size};

/// Corrects nominal label bounds to fit rendered text.
pub trait TextMeasure {
    /// Returns bounds that fit `text`, horizontally centred on `nominal` and
    /// top-aligned with it.
    fn external_label_bounds(&self, nominal: Bounds, text: &str) -> Bounds;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn external_label_bounds(&self, nominal: Bounds, text: &str) -> Bounds {
        (**self).external_label_bounds(nominal, text)
    }
}

/// Centres a measured text block on the nominal label bounds.
///
/// `x` and `y` are rounded, `width` and `height` rounded up, so the label never
/// clips its text.
fn fit_to_text(nominal: Bounds, measured: Size) -> Bounds {
    let x = (nominal.min_x() + nominal.width() / 2.0 - measured.width() / 2.0).round();
    let y = nominal.min_y().round();
    Bounds::from_rect(x, y, measured.width().ceil(), measured.height().ceil())
}

/// Measures text with system fonts using `cosmic-text`.
///
/// Text is wrapped at `max_width`, matching the width of a default external label.
pub struct FontMetrics {
    font_system: Arc<Mutex<FontSystem>>,
    font_family: String,
    font_size: f32,
    max_width: f32,
}

impl FontMetrics {
    /// Create a measurer for the given font family and size in points.
    pub fn new(font_family: impl Into<String>, font_size: f32, max_width: f32) -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
            font_family: font_family.into(),
            font_size,
            max_width,
        }
    }

    fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self.font_system.lock().expect("failed to lock FontSystem");

        // Points to pixels at standard DPI
        let font_size_px = self.font_size * 1.33;
        let line_height = font_size_px * 1.2;
        let metrics = Metrics::new(font_size_px, line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(&self.font_family));
        buffer.set_size(Some(self.max_width), None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;

        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if !layout_runs.is_empty() {
            for last in layout_runs.iter().map(|run| run.glyphs.last()) {
                if let Some(last) = last {
                    max_width = max_width.max(last.x + last.w);
                }
                total_height += metrics.line_height;
            }
        } else {
            // No fonts available; fall back to an estimate
            max_width = (text.chars().count() as f32 * font_size_px * 0.55).min(self.max_width);
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

impl TextMeasure for FontMetrics {
    fn external_label_bounds(&self, nominal: Bounds, text: &str) -> Bounds {
        fit_to_text(nominal, self.measure(text))
    }
}

/// Fixed-advance text estimate that wraps greedily on whitespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    char_width: f32,
    line_height: f32,
    max_width: f32,
}

impl MonospaceMetrics {
    pub fn new(char_width: f32, line_height: f32, max_width: f32) -> Self {
        Self {
            char_width,
            line_height,
            max_width,
        }
    }

    fn measure(&self, text: &str) -> Size {
        let max_chars = ((self.max_width / self.char_width).floor() as usize).max(1);
        let mut lines: Vec<usize> = Vec::new();
        let mut current = 0usize;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();
            let needed = if current == 0 {
                word_len
            } else {
                current + 1 + word_len
            };
            if needed <= max_chars || current == 0 {
                current = needed;
            } else {
                lines.push(current);
                current = word_len;
            }
        }
        if current > 0 {
            lines.push(current);
        }

        let widest = lines
            .iter()
            .map(|&chars| (chars as f32 * self.char_width).min(self.max_width))
            .fold(0.0, f32::max);
        Size::new(widest, lines.len() as f32 * self.line_height)
    }
}

impl Default for MonospaceMetrics {
    /// Roughly an 11pt sans-serif font in a 90px wide label.
    fn default() -> Self {
        Self::new(6.0, 14.0, 90.0)
    }
}

impl TextMeasure for MonospaceMetrics {
    fn external_label_bounds(&self, nominal: Bounds, text: &str) -> Bounds {
        fit_to_text(nominal, self.measure(text))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_fit_to_text_centres_horizontally() {
        let nominal = Bounds::from_rect(100.0, 200.0, 90.0, 20.0);
        let bounds = fit_to_text(nominal, Size::new(30.0, 14.0));

        assert_approx_eq!(f32, bounds.min_x(), 130.0);
        assert_approx_eq!(f32, bounds.min_y(), 200.0);
        assert_approx_eq!(f32, bounds.width(), 30.0);
        assert_approx_eq!(f32, bounds.height(), 14.0);
    }

    #[test]
    fn test_fit_to_text_rounds_up_size() {
        let nominal = Bounds::from_rect(0.0, 0.4, 90.0, 20.0);
        let bounds = fit_to_text(nominal, Size::new(30.2, 14.1));

        assert_approx_eq!(f32, bounds.min_y(), 0.0);
        assert_approx_eq!(f32, bounds.width(), 31.0);
        assert_approx_eq!(f32, bounds.height(), 15.0);
    }

    #[test]
    fn test_monospace_single_line() {
        let metrics = MonospaceMetrics::default();
        let size = metrics.measure("Order");

        assert_approx_eq!(f32, size.width(), 30.0);
        assert_approx_eq!(f32, size.height(), 14.0);
    }

    #[test]
    fn test_monospace_wraps_at_max_width() {
        // 15 characters per line at 6px in a 90px box
        let metrics = MonospaceMetrics::default();
        let size = metrics.measure("Confirm delivery");

        assert_approx_eq!(f32, size.height(), 28.0);
        assert_approx_eq!(f32, size.width(), 48.0);
    }

    #[test]
    fn test_monospace_overlong_word_is_clamped() {
        let metrics = MonospaceMetrics::default();
        let size = metrics.measure("Supercalifragilisticexpialidocious");

        assert_approx_eq!(f32, size.width(), 90.0);
        assert_approx_eq!(f32, size.height(), 14.0);
    }

    #[test]
    fn test_monospace_empty_text() {
        let size = MonospaceMetrics::default().measure("   ");
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 0.0);
    }
}
