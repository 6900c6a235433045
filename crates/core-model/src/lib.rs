//! Segmented control data model.
//!
//! Everything here is plain data shared by the selection tracker
//! (`core-state`), the terminal composer (`core-render`) and the config layer
//! (`core-config`):
//!
//! * [`Appearance`]: every option the control exposes, applied as a whole via
//!   `SegmentedControl::apply_style` so no setter reaches into layout state as
//!   a side effect.
//! * [`IndicatorGeometry`]: derived `(x, width)` of the selection bar.
//! * [`layout`]: the width allocator and the index-addressed array of segment
//!   frames it produces.
//!
//! Units are whatever the configured `TextMeasurer` returns: terminal columns
//! for the `segbar` binary, points for proportional hosts.

pub mod layout;

pub use core_text::Font;
pub use layout::{
    Allocation, AllocationBranch, LabelFrame, MIN_SEGMENT_WIDTH, SegmentFrame, SegmentLayout,
    allocate, compute_widths, natural_widths,
};

use std::time::Duration;

/// Default duration of the indicator slide.
pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(250);

/// How the indicator width is derived from the selected segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthStyle {
    /// Indicator spans the segment's full allocated slot.
    #[default]
    Fixed,
    /// Indicator spans the measured label, starting at its leading edge.
    Dynamic,
}

/// Edge of the control the indicator is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorPosition {
    Top,
    #[default]
    Bottom,
}

/// Indicator placement along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorGeometry {
    pub x: f32,
    pub width: f32,
}

impl IndicatorGeometry {
    pub const ZERO: IndicatorGeometry = IndicatorGeometry { x: 0.0, width: 0.0 };

    pub fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, to: &IndicatorGeometry, t: f32) -> IndicatorGeometry {
        let t = t.clamp(0.0, 1.0);
        IndicatorGeometry {
            x: self.x + (to.x - self.x) * t,
            width: self.width + (to.width - self.width) * t,
        }
    }
}

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Text attributes for one segment state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Rgb,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: Font::default(),
            color: Rgb::BLACK,
        }
    }
}

/// Marker shown on every segment before the selected one ("completed steps").
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedMarker {
    pub glyph: String,
    /// Horizontal space reserved for the marker in every segment.
    pub width: f32,
}

impl CompletedMarker {
    pub fn new(glyph: impl Into<String>, width: f32) -> Self {
        Self {
            glyph: glyph.into(),
            width,
        }
    }
}

/// Full option set of the control.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub indicator_color: Rgb,
    pub indicator_position: IndicatorPosition,
    pub indicator_height: f32,
    pub width_style: WidthStyle,
    /// Padding on each side of a label inside its segment.
    pub horizontal_inset: f32,
    /// Gap between the control and its container's left/right edges.
    pub horizontal_offset: f32,
    /// Taps may not select an index greater than the current one.
    pub forward_only: bool,
    pub completed_marker: Option<CompletedMarker>,
    pub normal_text: TextStyle,
    pub selected_text: TextStyle,
    pub animation: Duration,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            indicator_color: Rgb::BLACK,
            indicator_position: IndicatorPosition::Bottom,
            indicator_height: 5.0,
            width_style: WidthStyle::Fixed,
            horizontal_inset: 5.0,
            horizontal_offset: 0.0,
            forward_only: false,
            completed_marker: None,
            normal_text: TextStyle::default(),
            selected_text: TextStyle::default(),
            animation: DEFAULT_ANIMATION,
        }
    }
}

impl Appearance {
    /// Font labels are measured with (the normal-state font).
    pub fn measure_font(&self) -> &Font {
        &self.normal_text.font
    }

    /// Icon width passed to the allocator when a marker is configured.
    pub fn icon_width(&self) -> Option<f32> {
        self.completed_marker.as_ref().map(|m| m.width)
    }

    /// Width left for segments inside a container of `container_width`.
    pub fn available_width(&self, container_width: f32) -> f32 {
        (container_width - 2.0 * self.horizontal_offset).max(0.0)
    }
}
