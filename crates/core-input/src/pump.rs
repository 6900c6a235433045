//! Input pump: reads a crossterm event stream on a Tokio task and forwards
//! translated events into the runtime channel.
//!
//! The pump stops on the first of: shutdown signal, closed channel, stream end
//! or stream error. Each stop reason has its own counter in `core_events`.

use crate::translate::translate;
use core_events::{
    ASYNC_INPUT_STARTS, ASYNC_INPUT_STOP_CHANNEL, ASYNC_INPUT_STOP_ERROR, ASYNC_INPUT_STOP_SIGNAL,
    ASYNC_INPUT_STOP_STREAM, CHANNEL_SEND_FAILURES, Event, InputEvent, KEYPRESS_TOTAL, KeyToken,
    MOUSE_TOTAL,
};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, info, trace, warn};

/// Handle asking the pump to stop.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    Signal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl StopReason {
    fn as_str(self) -> &'static str {
        match self {
            StopReason::Signal => "shutdown_signal",
            StopReason::ChannelClosed => "channel_closed",
            StopReason::StreamEnded => "stream_ended",
            StopReason::StreamError => "stream_error",
        }
    }

    fn counter(self) -> &'static AtomicU64 {
        match self {
            StopReason::Signal => &ASYNC_INPUT_STOP_SIGNAL,
            StopReason::ChannelClosed => &ASYNC_INPUT_STOP_CHANNEL,
            StopReason::StreamEnded => &ASYNC_INPUT_STOP_STREAM,
            StopReason::StreamError => &ASYNC_INPUT_STOP_ERROR,
        }
    }
}

fn token_kind(token: &KeyToken) -> &'static str {
    match token {
        KeyToken::Char(_) => "char",
        KeyToken::Named(_) => "named",
        KeyToken::Chord { .. } => "chord",
    }
}

/// Trace one forwarded event without its key payload.
fn trace_input(input: &InputEvent) {
    match input {
        InputEvent::KeyPress(k) => trace!(
            target: "input.event",
            kind = "keypress",
            repeat = k.repeat,
            token_kind = token_kind(&k.token)
        ),
        InputEvent::Mouse(m) => trace!(
            target: "input.event",
            kind = "mouse",
            mouse_kind = ?m.kind,
            column = m.column,
            row = m.row
        ),
        InputEvent::Resize(w, h) => trace!(target: "input.event", kind = "resize", w, h),
        InputEvent::CtrlC => trace!(target: "input.event", kind = "ctrl_c"),
        InputEvent::FocusGained | InputEvent::FocusLost => {
            trace!(target: "input.event", kind = "focus")
        }
    }
}

struct InputPump<S> {
    sender: Sender<Event>,
    stream: S,
    shutdown: Arc<Notify>,
}

impl<S> InputPump<S>
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    async fn forward(&self, input: InputEvent) -> bool {
        trace_input(&input);
        let counter = match &input {
            InputEvent::KeyPress(_) => Some(&KEYPRESS_TOTAL),
            InputEvent::Mouse(_) => Some(&MOUSE_TOTAL),
            _ => None,
        };
        if self.sender.send(Event::Input(input)).await.is_err() {
            CHANNEL_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        if let Some(c) = counter {
            c.fetch_add(1, Ordering::Relaxed);
        }
        true
    }

    async fn next_stop(&mut self) -> StopReason {
        loop {
            let item = tokio::select! {
                biased;
                _ = self.shutdown.notified() => return StopReason::Signal,
                item = self.stream.next() => item,
            };
            match item {
                None => return StopReason::StreamEnded,
                Some(Err(err)) => {
                    warn!(target: "input.thread", error_kind = ?err.kind(), "async_input_task_stream_error");
                    return StopReason::StreamError;
                }
                Some(Ok(ev)) => {
                    if let Some(input) = translate(&ev)
                        && !self.forward(input).await
                    {
                        return StopReason::ChannelClosed;
                    }
                }
            }
        }
    }

    async fn run(mut self) {
        info!(target: "input.thread", "async_input_task_started");
        ASYNC_INPUT_STARTS.fetch_add(1, Ordering::Relaxed);
        let reason = self.next_stop().await;
        reason.counter().fetch_add(1, Ordering::Relaxed);
        info!(target: "input.thread", reason = reason.as_str(), "async_input_task_stopped");
    }
}

fn pump<S>(sender: Sender<Event>, stream: S) -> (InputPump<S>, AsyncInputShutdown) {
    let notify = Arc::new(Notify::new());
    let handle = AsyncInputShutdown {
        notify: Arc::clone(&notify),
    };
    (
        InputPump {
            sender,
            stream,
            shutdown: notify,
        },
        handle,
    )
}

/// Spawn the pump over the terminal's `EventStream`.
pub(crate) fn spawn_event_stream(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    let (task, shutdown) = pump(sender, EventStream::new());
    let span = tracing::debug_span!(target: "input.thread", "input_async_task");
    let handle = tokio::spawn(task.run().instrument(span));
    (handle, shutdown)
}
