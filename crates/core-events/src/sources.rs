//! Event sources that run as their own Tokio tasks.

use crate::Event;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A task producing runtime events. It must return once sending fails.
pub trait AsyncEventSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

#[derive(Default)]
pub struct EventSourceRegistry {
    pending: Vec<Box<dyn AsyncEventSource>>,
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsyncEventSource>(&mut self, source: S) {
        self.pending.push(Box::new(source));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Start every pending source. Sources are consumed, so calling this twice
    /// spawns nothing the second time.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        self.pending
            .drain(..)
            .map(|source| {
                tracing::info!(target: "runtime.events", source = source.name(), "event_source_spawned");
                source.spawn(tx.clone())
            })
            .collect()
    }
}

/// Sends `Event::Tick` at a fixed period. Late ticks are skipped, not bunched.
pub struct TickEventSource {
    period: Duration,
}

impl TickEventSource {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let period = self.period;
        tokio::spawn(async move {
            let mut clock = tokio::time::interval(period);
            clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                clock.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    return;
                }
            }
        })
    }
}
