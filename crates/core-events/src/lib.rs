//! Runtime events for segbar.
//!
//! The terminal input task and the tick source push [`Event`]s into one
//! bounded mpsc channel; the runtime loop drains it.

mod input;
mod sources;

pub use input::{InputEvent, KeyPress, KeyToken, ModMask, MouseButton, MouseEvent, MouseEventKind, NamedKey};
pub use sources::{AsyncEventSource, EventSourceRegistry, TickEventSource};

use std::sync::atomic::AtomicU64;

/// Capacity of the runtime channel. Producers await when it is full.
pub const EVENT_CHANNEL_CAP: usize = 1024;

// Input task counters. Updated with relaxed ordering, read by tests and
// shutdown diagnostics.
pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static MOUSE_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STARTS: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_SIGNAL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_CHANNEL: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_STREAM: AtomicU64 = AtomicU64::new(0);
pub static ASYNC_INPUT_STOP_ERROR: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Animation clock.
    Tick,
    /// Repaint without any state change.
    Redraw,
    Shutdown,
}

impl Event {
    /// Short label for trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Input(_) => "input",
            Event::Tick => "tick",
            Event::Redraw => "redraw",
            Event::Shutdown => "shutdown",
        }
    }
}
