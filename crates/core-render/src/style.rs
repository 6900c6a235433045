//! Appearance to terminal attribute mapping.
//!
//! The model speaks in `Rgb` + `TextStyle`; the frame speaks in
//! [`CellStyle`]. [`StripPalette`] is derived once per `apply_style` and
//! reused for every frame.

use crate::CellStyle;
use core_model::{Appearance, Rgb, TextStyle};
use crossterm::style::Color;

/// Resolved cell styles for every role in the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripPalette {
    pub normal: CellStyle,
    pub selected: CellStyle,
    pub marker: CellStyle,
    pub indicator: CellStyle,
    pub status: CellStyle,
}

impl Default for StripPalette {
    fn default() -> Self {
        Self::from_appearance(&Appearance::default())
    }
}

fn text_cell_style(style: &TextStyle) -> CellStyle {
    CellStyle::fg(style.color).with_bold(style.font.bold)
}

impl StripPalette {
    pub fn from_appearance(a: &Appearance) -> Self {
        Self {
            normal: text_cell_style(&a.normal_text),
            selected: text_cell_style(&a.selected_text),
            marker: CellStyle::fg(a.indicator_color),
            indicator: CellStyle::PLAIN.with_bg(a.indicator_color),
            status: CellStyle::PLAIN,
        }
    }
}

pub fn to_crossterm(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}
