//! Render timing instrumentation.
//!
//! Process-wide counters so the binary and integration tests can read frame
//! cost without threading a metrics handle through the event loop.
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_RENDER_NS: AtomicU64 = AtomicU64::new(0);
static FRAMES_RENDERED: AtomicU64 = AtomicU64::new(0);
static ROWS_EMITTED: AtomicU64 = AtomicU64::new(0);

/// Record one completed render.
pub fn record_render(ns: u64, rows: u64) {
    LAST_RENDER_NS.store(ns, Ordering::Relaxed);
    FRAMES_RENDERED.fetch_add(1, Ordering::Relaxed);
    ROWS_EMITTED.fetch_add(rows, Ordering::Relaxed);
}

pub fn last_render_ns() -> u64 {
    LAST_RENDER_NS.load(Ordering::Relaxed)
}

pub fn frames_rendered() -> u64 {
    FRAMES_RENDERED.load(Ordering::Relaxed)
}

pub fn rows_emitted() -> u64 {
    ROWS_EMITTED.load(Ordering::Relaxed)
}
