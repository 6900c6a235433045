//! segbar entrypoint: a horizontally scrolling segmented control in the terminal.
use anyhow::Result;
use clap::{Parser, ValueEnum};
use core_config::load_from;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent, TickEventSource};
use core_model::WidthStyle;
use core_terminal::{CrosstermBackend, ScreenOptions, Session};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod app;

use app::{App, LoopControl, Overrides};

const LOG_FILE: &str = "segbar.log";
const SOURCE_JOIN_LIMIT: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WidthStyleArg {
    Fixed,
    Dynamic,
}

impl From<WidthStyleArg> for WidthStyle {
    fn from(w: WidthStyleArg) -> Self {
        match w {
            WidthStyleArg::Fixed => WidthStyle::Fixed,
            WidthStyleArg::Dynamic => WidthStyle::Dynamic,
        }
    }
}

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "segbar", version, about = "Segmented control in the terminal")]
struct Args {
    /// Segment labels. Falls back to the config file, then a sample set.
    items: Vec<String>,
    /// Configuration file path (overrides discovery of `segbar.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Initially selected segment (0-based, not animated).
    #[arg(long = "select")]
    select: Option<usize>,
    /// Taps may not move the selection forward.
    #[arg(long = "forward-only")]
    forward_only: bool,
    #[arg(long = "width-style", value_enum)]
    width_style: Option<WidthStyleArg>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            forward_only: self.forward_only,
            width_style: self.width_style.map(Into::into),
        }
    }
}

/// Why the event loop ended. Logged with every shutdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    CtrlC,
    ShutdownEvent,
    ChannelClosed,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        })
    }
}

/// Log file in the working directory, truncated per run. Filtering follows
/// `RUST_LOG`; nothing is logged when it is unset.
fn configure_logging() -> Option<WorkerGuard> {
    let dir = Path::new(".");
    let _ = std::fs::remove_file(dir.join(LOG_FILE));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime.panic", %info, "panic");
            previous(info);
        }));
    });
}

/// Wait for a background task, bounded by `limit` when given.
async fn join_task(
    reason: ShutdownReason,
    task: &'static str,
    handle: JoinHandle<()>,
    limit: Option<Duration>,
) {
    let joined = match limit {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(res) => res,
            Err(_) => {
                warn!(target: "runtime.shutdown", %reason, task, "task_join_timeout");
                return;
            }
        },
        None => handle.await,
    };
    match joined {
        Ok(()) => trace!(target: "runtime.shutdown", %reason, task, "task_joined"),
        Err(err) if err.is_cancelled() => {
            trace!(target: "runtime.shutdown", %reason, task, "task_cancelled")
        }
        Err(err) => error!(target: "runtime.shutdown", %reason, task, ?err, "task_join_failed"),
    }
}

struct Runtime {
    app: App,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
}

impl Runtime {
    async fn run(&mut self) -> Result<()> {
        self.draw();

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            trace!(target: "runtime.events", kind = event.kind(), "event");
            let now = Instant::now();
            let control = match &event {
                Event::Input(InputEvent::CtrlC) => {
                    reason = ShutdownReason::CtrlC;
                    LoopControl::Quit
                }
                Event::Input(input) => self.handle_input(input, now),
                Event::Tick => {
                    if self.app.handle_tick(now) {
                        self.draw();
                    }
                    LoopControl::Continue
                }
                Event::Redraw => {
                    self.draw();
                    LoopControl::Continue
                }
                Event::Shutdown => {
                    reason = ShutdownReason::ShutdownEvent;
                    LoopControl::Quit
                }
            };
            if control == LoopControl::Quit {
                if reason == ShutdownReason::ChannelClosed {
                    reason = ShutdownReason::Quit;
                }
                break;
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(())
    }

    fn handle_input(&mut self, input: &InputEvent, now: Instant) -> LoopControl {
        let control = match input {
            InputEvent::KeyPress(key) => self.app.handle_key(&key.token, now),
            InputEvent::Mouse(mouse) => {
                self.app.handle_mouse(mouse, now);
                LoopControl::Continue
            }
            InputEvent::Resize(w, h) => {
                self.app.handle_resize(*w, *h, now);
                LoopControl::Continue
            }
            InputEvent::CtrlC => LoopControl::Quit,
            InputEvent::FocusGained | InputEvent::FocusLost => LoopControl::Continue,
        };
        // Animated changes are drawn by the next tick; everything else now.
        if control == LoopControl::Continue
            && self.app.is_dirty()
            && !self.app.animator().is_animating()
        {
            self.draw();
        }
        control
    }

    fn draw(&mut self) {
        if let Err(e) = self.app.render_to(&mut std::io::stdout(), Instant::now()) {
            error!(target: "render.strip", ?e, "render_error");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", %reason, stage = "begin", "shutdown_stage");
        // Sources stop once the last sender is gone.
        self.tx = None;
        for handle in self.source_handles.drain(..) {
            handle.abort();
            join_task(reason, "event_source", handle, Some(SOURCE_JOIN_LIMIT)).await;
        }
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            join_task(reason, "input", handle, None).await;
        }
        info!(target: "runtime.shutdown", %reason, stage = "complete", "shutdown_stage");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    let items = if args.items.is_empty() {
        config.items()
    } else {
        args.items.clone()
    };
    let tick = config.tick_interval();

    let mut backend = CrosstermBackend::new(ScreenOptions::titled("segbar"));
    let session = Session::enter(&mut backend)?;
    let size = session.size()?;

    let mut app = App::new(items, config, args.overrides(), size);
    if let Some(index) = args.select {
        app.select_initial(index);
    }
    info!(
        target: "runtime.startup",
        items = app.control().item_count(),
        selected = app.control().selected(),
        columns = size.0,
        rows = size.1,
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(tick));
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = Runtime {
        app,
        rx,
        tx: Some(tx),
        source_handles,
        input_task: Some(input_task),
        input_shutdown: Some(input_shutdown),
    };
    let result = runtime.run().await;
    session.close()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_items_and_flags() {
        let args = Args::try_parse_from([
            "segbar",
            "a",
            "b",
            "--select",
            "1",
            "--forward-only",
            "--width-style",
            "dynamic",
        ])
        .unwrap();
        assert_eq!(args.items, vec!["a", "b"]);
        assert_eq!(args.select, Some(1));
        let o = args.overrides();
        assert!(o.forward_only);
        assert_eq!(o.width_style, Some(WidthStyle::Dynamic));
    }

    #[test]
    fn defaults_without_arguments() {
        let args = Args::try_parse_from(["segbar"]).unwrap();
        assert!(args.items.is_empty());
        assert_eq!(args.overrides(), Overrides::default());
    }

    #[test]
    fn rejects_unknown_width_style() {
        assert!(Args::try_parse_from(["segbar", "--width-style", "wide"]).is_err());
    }

    #[test]
    fn shutdown_reason_labels() {
        assert_eq!(ShutdownReason::CtrlC.to_string(), "ctrl_c");
        assert_eq!(ShutdownReason::ChannelClosed.to_string(), "channel_closed");
    }
}
