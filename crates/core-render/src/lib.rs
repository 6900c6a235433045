//! Terminal rendering for the segmented control.
//!
//! A render pass composes a [`Frame`] of grapheme cells (strip rows, status
//! line, help line), diffs it row by row against the previous frame and emits
//! only changed rows through the [`writer::Writer`].
//!
//! Cell invariants:
//! - Leader: width >= 1, `cluster` non-empty.
//! - Continuation: width == 0, `cluster` empty, immediately follows its leader.
//! - Emission prints leaders only, each cluster exactly once, so combining
//!   marks, variation selectors and ZWJ sequences are never split.
//!
//! Modules:
//! - `strip`: places labels, completed markers and the indicator.
//! - `animation`: eases the indicator between geometries.
//! - `viewport`: horizontal scroll window over the segment content.
//! - `status`: status line segments.
//! - `render`: frame diffing + emission + metrics.

use bitflags::bitflags;
use core_model::Rgb;

pub mod animation;
pub mod render;
pub mod status;
pub mod strip;
pub mod style;
pub mod timing;
pub mod viewport;
pub mod writer;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const SELECTED  = 0b0000_0001; // part of the selected segment's label
        const INDICATOR = 0b0000_0010; // indicator bar
        const MARKER    = 0b0000_0100; // completed marker glyph
        const STATUS    = 0b0000_1000; // status / help rows
    }
}

/// Concrete terminal attributes of one cell. `None` colors use the terminal
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CellStyle {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub bold: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        fg: None,
        bg: None,
        bold: false,
    };

    pub fn fg(color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..Self::PLAIN
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_bg(mut self, color: Rgb) -> Self {
        self.bg = Some(color);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Full grapheme cluster (leader cells only). Empty for continuation cells.
    pub cluster: String,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
    pub style: CellStyle,
}

impl Cell {
    #[inline]
    pub fn leader(cluster: &str, width: u16, flags: CellFlags, style: CellStyle) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.clamp(1, u16::from(u8::MAX)) as u8,
            flags,
            style,
        }
    }

    #[inline]
    pub fn continuation(flags: CellFlags, style: CellStyle) -> Self {
        Self {
            cluster: String::new(),
            width: 0,
            flags,
            style,
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }

    #[inline]
    pub fn visual_width(&self) -> u16 {
        u16::from(self.width)
    }

    #[inline]
    pub fn cluster(&self) -> &str {
        &self.cluster
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
            style: CellStyle::PLAIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Cells of row `y` (empty when out of bounds).
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = usize::from(y) * usize::from(self.width);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Set a full cluster at (x,y) and populate continuation cells for its width.
    /// A cluster wider than the remaining row is clipped.
    pub fn set_cluster(
        &mut self,
        x: u16,
        y: u16,
        cluster: &str,
        width: u16,
        flags: CellFlags,
        style: CellStyle,
    ) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = width.max(1).min(self.width - x);
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags, style);
        }
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags, style);
            }
        }
    }

    /// Fill `[x, x + span)` of row `y` with blank cells in `style`.
    pub fn fill(&mut self, x: u16, y: u16, span: u16, flags: CellFlags, style: CellStyle) {
        let span = span.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx] = Cell::leader(" ", 1, flags, style);
            }
        }
    }

    /// Write `text` starting at column `x`, clipped to `[x, limit)`. Returns
    /// the column after the last written cluster.
    pub fn put_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        limit: u16,
        flags: CellFlags,
        style: CellStyle,
    ) -> u16 {
        let limit = limit.min(self.width);
        let label = core_text::segment(text);
        let mut col = x;
        for (g, w) in label.iter() {
            let w = w.max(1);
            if col.saturating_add(w) > limit {
                break;
            }
            self.set_cluster(col, y, g, w, flags, style);
            col += w;
        }
        col
    }

    /// Iterate leader cells of a row, yielding (&str, width, flags, style, start_x).
    pub fn row_leaders(
        &self,
        y: u16,
    ) -> impl Iterator<Item = (&str, u16, CellFlags, CellStyle, u16)> + '_ {
        let row = self.row(y);
        let mut x = 0usize;
        std::iter::from_fn(move || {
            while x < row.len() {
                let cell = &row[x];
                if cell.is_leader() {
                    let w = cell.visual_width();
                    let out = (cell.cluster(), w, cell.flags, cell.style, x as u16);
                    x += usize::from(w);
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Leader cluster strings of a row (tests / diagnostics).
    pub fn line_clusters(&self, y: u16) -> Vec<&str> {
        self.row_leaders(y).map(|(c, ..)| c).collect()
    }

    /// Row text with continuation cells skipped.
    pub fn line_text(&self, y: u16) -> String {
        self.row_leaders(y).map(|(c, ..)| c).collect()
    }

    /// Columns of row `y` carrying all of `flags`.
    pub fn columns_with(&self, y: u16, flags: CellFlags) -> Vec<u16> {
        self.row(y)
            .iter()
            .enumerate()
            .filter(|(_, c)| c.flags.contains(flags))
            .map(|(x, _)| x as u16)
            .collect()
    }
}
