//! Frame assembly, row diffing and emission.
//!
//! [`Scene`] gathers everything one screen shows and composes a [`Frame`].
//! [`StripRenderer`] keeps the previously emitted frame and repaints only rows
//! whose cells changed. A size change forces a clear plus a full repaint.

use crate::status::{StatusContext, build_status};
use crate::strip::{StripArea, compose_strip};
use crate::viewport::HorizontalViewport;
use crate::writer::{WriteStats, Writer};
use crate::{CellFlags, Frame, style::StripPalette, timing};
use anyhow::Result;
use core_model::IndicatorGeometry;
use core_state::SegmentedControl;
use core_text::TextMeasurer;
use std::io::Write;
use std::time::Instant;

/// Everything drawn in one frame.
pub struct Scene<'a, M> {
    pub control: &'a SegmentedControl<M>,
    pub indicator: IndicatorGeometry,
    pub viewport: &'a HorizontalViewport,
    pub palette: &'a StripPalette,
    pub area: StripArea,
    pub status: StatusContext<'a>,
    pub help: Option<&'a str>,
}

impl<M: TextMeasurer> Scene<'_, M> {
    /// Status sits one blank row below the strip; help takes the last row.
    pub fn status_row(&self) -> u16 {
        self.area.bottom().saturating_add(1)
    }

    pub fn compose(&self, width: u16, height: u16) -> Frame {
        let mut frame = Frame::new(width, height);
        compose_strip(
            &mut frame,
            self.control,
            self.indicator,
            self.viewport,
            self.palette,
            &self.area,
        );
        let status_y = self.status_row();
        if status_y < height {
            frame.put_str(
                self.area.x,
                status_y,
                &build_status(&self.status),
                width,
                CellFlags::STATUS,
                self.palette.status,
            );
        }
        if let Some(help) = self.help {
            let help_y = height.saturating_sub(1);
            if height > 0 && help_y > status_y {
                frame.put_str(0, help_y, help, width, CellFlags::STATUS, self.palette.status);
            }
        }
        frame
    }
}

/// Outcome of one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub full: bool,
    pub rows: u16,
    pub write: WriteStats,
}

/// Cumulative counters for one renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderMetrics {
    pub frames: u64,
    pub full_frames: u64,
    pub skipped_frames: u64,
    pub rows_repainted: u64,
    pub print_commands: u64,
    pub style_changes: u64,
}

#[derive(Debug, Default)]
pub struct StripRenderer {
    prev: Option<Frame>,
    metrics: RenderMetrics,
}

impl StripRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.metrics
    }

    /// Drop the cached frame; the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Rows of `next` that differ from the previous frame (all rows when the
    /// size changed or nothing was emitted yet).
    pub fn dirty_rows(&self, next: &Frame) -> (bool, Vec<u16>) {
        match &self.prev {
            Some(prev) if prev.width == next.width && prev.height == next.height => (
                false,
                (0..next.height)
                    .filter(|&y| prev.row(y) != next.row(y))
                    .collect(),
            ),
            _ => (true, (0..next.height).collect()),
        }
    }

    pub fn render_to<W: Write>(&mut self, frame: Frame, out: &mut W) -> Result<RenderStats> {
        let start = Instant::now();
        let (full, rows) = self.dirty_rows(&frame);
        if rows.is_empty() {
            self.metrics.frames += 1;
            self.metrics.skipped_frames += 1;
            return Ok(RenderStats::default());
        }
        let mut w = Writer::new();
        if full {
            w.clear_all();
        }
        for &y in &rows {
            w.move_to(0, y);
            for (cluster, _, _, style, _) in frame.row_leaders(y) {
                w.set_style(style);
                w.print(cluster);
            }
        }
        let write = w.flush_to(out)?;
        self.prev = Some(frame);

        let elapsed = start.elapsed().as_nanos() as u64;
        timing::record_render(elapsed, rows.len() as u64);
        self.metrics.frames += 1;
        self.metrics.rows_repainted += rows.len() as u64;
        self.metrics.print_commands += write.print_commands;
        self.metrics.style_changes += write.style_changes;
        if full {
            self.metrics.full_frames += 1;
        }
        tracing::debug!(
            target: "render.strip",
            full,
            rows = rows.len(),
            prints = write.print_commands,
            bytes = write.bytes,
            ns = elapsed,
            "frame_emitted"
        );
        Ok(RenderStats {
            full,
            rows: rows.len() as u16,
            write,
        })
    }

    pub fn render(&mut self, frame: Frame) -> Result<RenderStats> {
        self.render_to(frame, &mut std::io::stdout())
    }
}
