//! Strip composition.
//!
//! Paints one segmented control into a [`Frame`]: a label row (completed
//! markers, labels centered in their slots) plus `indicator_rows` rows of
//! indicator bar above or below it. Content x coordinates are mapped through
//! the [`HorizontalViewport`] and clipped to the strip area; clusters that
//! would straddle either edge are dropped whole.

use crate::viewport::HorizontalViewport;
use crate::{CellFlags, CellStyle, Frame, style::StripPalette};
use core_model::{Appearance, IndicatorGeometry, IndicatorPosition};
use core_state::SegmentedControl;
use core_text::TextMeasurer;

/// Screen rectangle the strip occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StripArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Rows reserved for the indicator bar.
pub fn indicator_rows(appearance: &Appearance) -> u16 {
    appearance.indicator_height.max(0.0).round().min(f32::from(u16::MAX - 1)) as u16
}

impl StripArea {
    pub fn for_appearance(x: u16, y: u16, width: u16, appearance: &Appearance) -> Self {
        Self {
            x,
            y,
            width,
            height: 1 + indicator_rows(appearance),
        }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row, saturating at `u16::MAX`.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }

    pub fn label_row(&self, position: IndicatorPosition) -> u16 {
        match position {
            IndicatorPosition::Top => self.bottom().saturating_sub(1).max(self.y),
            IndicatorPosition::Bottom => self.y,
        }
    }

    /// Rows of the indicator bar, top to bottom.
    pub fn indicator_rows(&self, position: IndicatorPosition) -> std::ops::Range<u16> {
        match position {
            IndicatorPosition::Top => self.y..self.label_row(position),
            IndicatorPosition::Bottom => self.y.saturating_add(1)..self.bottom(),
        }
    }
}

fn column(area: &StripArea, viewport: &HorizontalViewport, x: f32) -> i32 {
    i32::from(area.x) + viewport.to_screen(x).round() as i32
}

/// Write `text` from signed column `col`, keeping only clusters wholly inside
/// the strip.
fn put_clipped(
    frame: &mut Frame,
    area: &StripArea,
    mut col: i32,
    y: u16,
    text: &str,
    flags: CellFlags,
    style: CellStyle,
) {
    let label = core_text::segment(text);
    let right = i32::from(area.right().min(frame.width));
    for (g, w) in label.iter() {
        let w = i32::from(w.max(1));
        if col >= i32::from(area.x) && col + w <= right {
            frame.set_cluster(col as u16, y, g, w as u16, flags, style);
        }
        col += w;
        if col >= right {
            break;
        }
    }
}

/// Paint the control into `frame` within `area`. `indicator` is the geometry
/// to draw this frame (an animation sample, not necessarily the target).
pub fn compose_strip<M: TextMeasurer>(
    frame: &mut Frame,
    control: &SegmentedControl<M>,
    indicator: IndicatorGeometry,
    viewport: &HorizontalViewport,
    palette: &StripPalette,
    area: &StripArea,
) {
    let appearance = control.appearance();
    let position = appearance.indicator_position;
    let label_y = area.label_row(position);
    let layout = control.layout();

    for seg in layout.frames() {
        let state = control.segment_state(seg.index);
        let Some(label) = layout.label_frame(seg.index, state.marker) else {
            continue;
        };
        if let (Some(mx), Some(marker)) = (label.marker_x, appearance.completed_marker.as_ref()) {
            put_clipped(
                frame,
                area,
                column(area, viewport, mx),
                label_y,
                &marker.glyph,
                CellFlags::MARKER,
                palette.marker,
            );
        }
        let (flags, style) = if state.selected {
            (CellFlags::SELECTED, palette.selected)
        } else {
            (CellFlags::empty(), palette.normal)
        };
        put_clipped(
            frame,
            area,
            column(area, viewport, label.text_x),
            label_y,
            &seg.label,
            flags,
            style,
        );
    }

    if layout.is_empty() || indicator.width <= 0.0 {
        return;
    }
    let left = column(area, viewport, indicator.x);
    let mut right = column(area, viewport, indicator.end());
    if right <= left {
        right = left + 1;
    }
    let left = left.max(i32::from(area.x));
    let right = right.min(i32::from(area.right()));
    if right <= left {
        return;
    }
    let rows = area.indicator_rows(position);
    for y in rows.start..rows.end.min(frame.height) {
        frame.fill(
            left as u16,
            y,
            (right - left) as u16,
            CellFlags::INDICATOR,
            palette.indicator,
        );
    }
}

/// Segment under screen cell (`column`, `row`), if any.
pub fn hit_test<M: TextMeasurer>(
    control: &SegmentedControl<M>,
    viewport: &HorizontalViewport,
    area: &StripArea,
    column: u16,
    row: u16,
) -> Option<usize> {
    if !area.contains(column, row) {
        return None;
    }
    let x = viewport.to_content(f32::from(column - area.x) + 0.5);
    control.layout().segment_at(x)
}
