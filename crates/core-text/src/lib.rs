//! Label measurement for segment layout.
//!
//! The width allocator never talks to a rendering backend directly. It asks a
//! [`TextMeasurer`] for the single-line advance of a label in a given [`Font`]
//! and works purely in the returned units. Terminal hosts use
//! [`CellMeasurer`] (one unit per terminal column); proportional hosts and
//! tests can use [`AdvanceMeasurer`], which scales the column count by the
//! font's point size.
//!
//! Invariants:
//! - Measurement is pure: the same text and font always yield the same width.
//! - Widths are never negative; the empty string measures 0.
//! - All column decisions flow through [`egc_width`] so the renderer and the
//!   allocator agree on cluster widths.

pub mod segment;
pub mod width;

pub use segment::{Cluster, Segmented, display_width, segment};
pub use width::egc_width;

/// Point size used when no text style overrides the font.
pub const DEFAULT_FONT_SIZE: f32 = 15.0;

/// Family name for the platform default face.
pub const SYSTEM_FAMILY: &str = "system";

/// Font description handed to a [`TextMeasurer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    /// Regular weight system face at `size` points.
    pub fn system(size: f32) -> Self {
        Self::new(SYSTEM_FAMILY, size)
    }

    /// Bold system face at `size` points.
    pub fn bold_system(size: f32) -> Self {
        Self {
            bold: true,
            ..Self::system(size)
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(DEFAULT_FONT_SIZE)
    }
}

/// Measures the rendered single-line width of a label.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &Font) -> f32;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &Font) -> f32 {
        (**self).measure(text, font)
    }
}

/// Terminal measurer: width is the number of display columns. Terminals use
/// one fixed face, so the font is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMeasurer;

impl TextMeasurer for CellMeasurer {
    fn measure(&self, text: &str, _font: &Font) -> f32 {
        f32::from(display_width(text))
    }
}

/// Monospace advance model for hosts that lay out in points: each display
/// column advances `em_per_column × font.size`.
#[derive(Debug, Clone, Copy)]
pub struct AdvanceMeasurer {
    pub em_per_column: f32,
}

impl AdvanceMeasurer {
    pub fn new(em_per_column: f32) -> Self {
        Self { em_per_column }
    }
}

impl Default for AdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for AdvanceMeasurer {
    fn measure(&self, text: &str, font: &Font) -> f32 {
        let columns = f32::from(display_width(text));
        (columns * self.em_per_column * font.size).max(0.0)
    }
}
