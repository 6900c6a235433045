//! Terminal input for the segment bar: crossterm events in, `core_events::Event` out.

mod pump;
mod translate;

pub use pump::AsyncInputShutdown;
pub use translate::{key_token, mod_mask, translate, translate_key, translate_mouse};

use core_events::Event;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Spawn the input task. Returns its `JoinHandle` and a handle that stops it.
pub fn spawn_async_input(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    pump::spawn_event_stream(sender)
}
