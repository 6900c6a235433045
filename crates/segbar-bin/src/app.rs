//! Host state for one segmented control on a terminal screen.
//!
//! `App` owns the control plus everything the terminal adds around it: the
//! indicator animator, the horizontal viewport and the renderer. Input
//! handlers return a [`LoopControl`] and mark the screen dirty; the event loop
//! decides when to draw.

use core_config::{Config, ConfigContext};
use core_events::{KeyToken, ModMask, MouseButton, MouseEvent, MouseEventKind, NamedKey};
use core_model::{Appearance, WidthStyle};
use core_render::animation::IndicatorAnimator;
use core_render::render::{RenderStats, Scene, StripRenderer};
use core_render::status::StatusContext;
use core_render::strip::{StripArea, hit_test};
use core_render::style::StripPalette;
use core_render::viewport::HorizontalViewport;
use core_render::Frame;
use core_state::{IndicatorTransition, SegmentedControl, SelectionUpdate, TapOutcome};
use core_text::CellMeasurer;
use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Row the strip starts on; row 0 stays blank as a top margin.
pub const STRIP_TOP: u16 = 1;
/// Columns moved per wheel notch.
pub const WHEEL_STEP: f32 = 3.0;
pub const HELP: &str = "←/→ select  1-9 tap  Home/End  n next  wheel scroll  q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Command-line settings that win over the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub forward_only: bool,
    pub width_style: Option<WidthStyle>,
}

impl Overrides {
    pub fn apply(&self, mut appearance: Appearance) -> Appearance {
        appearance.forward_only |= self.forward_only;
        if let Some(style) = self.width_style {
            appearance.width_style = style;
        }
        appearance
    }
}

pub struct App {
    control: SegmentedControl<CellMeasurer>,
    config: Config,
    overrides: Overrides,
    animator: IndicatorAnimator,
    viewport: HorizontalViewport,
    palette: StripPalette,
    renderer: StripRenderer,
    size: (u16, u16),
    last_callback: Rc<Cell<Option<usize>>>,
    dirty: bool,
}

impl App {
    pub fn new(
        items: Vec<String>,
        mut config: Config,
        overrides: Overrides,
        size: (u16, u16),
    ) -> Self {
        let (cols, rows) = size;
        config.apply_context(ConfigContext::new(cols, rows));
        let appearance = overrides.apply(config.appearance());
        let palette = StripPalette::from_appearance(&appearance);
        let mut control = SegmentedControl::new(items, CellMeasurer)
            .with_appearance(appearance)
            .with_container_width(f32::from(cols));

        let last_callback = Rc::new(Cell::new(None));
        let sink = Rc::clone(&last_callback);
        control.on_index_changed(move |index| {
            info!(target: "runtime", index, "index_changed");
            sink.set(Some(index));
        });

        let layout = control.layout();
        let viewport = HorizontalViewport::new(layout.available_width(), layout.content_width());
        let animator = IndicatorAnimator::new(control.indicator());
        Self {
            control,
            config,
            overrides,
            animator,
            viewport,
            palette,
            renderer: StripRenderer::new(),
            size,
            last_callback,
            dirty: true,
        }
    }

    pub fn control(&self) -> &SegmentedControl<CellMeasurer> {
        &self.control
    }

    pub fn viewport(&self) -> &HorizontalViewport {
        &self.viewport
    }

    pub fn animator(&self) -> &IndicatorAnimator {
        &self.animator
    }

    pub fn last_callback(&self) -> Option<usize> {
        self.last_callback.get()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Initial non-animated selection. Out-of-range requests are logged and
    /// ignored.
    pub fn select_initial(&mut self, index: usize) {
        match self.control.try_set_selected_index(index, false) {
            Ok(update) => self.apply_update(update, Instant::now()),
            Err(err) => warn!(target: "runtime", %err, "initial_selection_ignored"),
        }
    }

    pub fn area(&self) -> StripArea {
        let offset = self.config.effective_horizontal_offset;
        let width = self.viewport.width.max(0.0).floor() as u16;
        StripArea::for_appearance(offset, STRIP_TOP, width, self.control.appearance())
    }

    fn apply_update(&mut self, update: SelectionUpdate, now: Instant) {
        self.animator.start(&update.transition, now);
        self.viewport.reveal(update.reveal.start, update.reveal.end);
        self.dirty = true;
    }

    fn apply_transition(&mut self, transition: IndicatorTransition, now: Instant) {
        self.animator.start(&transition, now);
        let layout = self.control.layout();
        self.viewport
            .set_bounds(layout.available_width(), layout.content_width());
        if let Some(frame) = layout.frame(self.control.selected()) {
            let (start, end) = (frame.offset, frame.end());
            self.viewport.reveal(start, end);
        }
        self.dirty = true;
    }

    /// Programmatic selection (arrow keys, `n`). Never fires the callback.
    pub fn select(&mut self, index: usize, now: Instant) {
        if let Ok(update) = self.control.try_set_selected_index(index, true) {
            self.apply_update(update, now);
        }
    }

    pub fn tap(&mut self, index: usize, now: Instant) {
        let outcome = self.control.report_tap(index);
        if let TapOutcome::Applied { update, .. } = outcome {
            self.apply_update(update, now);
        }
    }

    pub fn handle_key(&mut self, token: &KeyToken, now: Instant) -> LoopControl {
        let selected = self.control.selected();
        let count = self.control.item_count();
        match token {
            KeyToken::Char('q') | KeyToken::Named(NamedKey::Esc) => return LoopControl::Quit,
            KeyToken::Chord { base, mods } if mods.contains(ModMask::CTRL) => {
                if **base == KeyToken::Char('c') {
                    return LoopControl::Quit;
                }
            }
            KeyToken::Named(NamedKey::Left) => {
                if selected > 0 {
                    self.select(selected - 1, now);
                }
            }
            KeyToken::Named(NamedKey::Right | NamedKey::Enter) | KeyToken::Char('n') => {
                if selected + 1 < count {
                    self.select(selected + 1, now);
                }
            }
            KeyToken::Named(NamedKey::Home) => self.select(0, now),
            KeyToken::Named(NamedKey::End) => {
                if count > 0 {
                    self.select(count - 1, now);
                }
            }
            KeyToken::Char(c @ '1'..='9') => {
                let index = (*c as usize) - ('1' as usize);
                self.tap(index, now);
            }
            _ => {}
        }
        LoopControl::Continue
    }

    pub fn handle_mouse(&mut self, ev: &MouseEvent, now: Instant) {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let area = self.area();
                if let Some(index) =
                    hit_test(&self.control, &self.viewport, &area, ev.column, ev.row)
                {
                    self.tap(index, now);
                }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
                self.dirty |= self.viewport.scroll_by(-WHEEL_STEP);
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
                self.dirty |= self.viewport.scroll_by(WHEEL_STEP);
            }
            _ => {}
        }
    }

    pub fn handle_resize(&mut self, cols: u16, rows: u16, now: Instant) {
        self.size = (cols, rows);
        self.renderer.invalidate();
        if self
            .config
            .recompute_with_context(ConfigContext::new(cols, rows))
        {
            debug!(
                target: "runtime",
                offset = self.config.effective_horizontal_offset,
                indicator_rows = ?self.config.effective_indicator_height,
                "config_context_changed"
            );
            let appearance = self.overrides.apply(self.config.appearance());
            self.palette = StripPalette::from_appearance(&appearance);
            let t = self.control.apply_style(appearance);
            self.apply_transition(t, now);
        }
        if let Some(t) = self.control.set_container_width(f32::from(cols)) {
            self.apply_transition(t, now);
        }
        self.dirty = true;
    }

    /// Advance the animation. Returns whether a redraw is due.
    pub fn handle_tick(&mut self, now: Instant) -> bool {
        if self.animator.is_animating() {
            self.animator.sample(now);
            self.dirty = true;
        }
        self.dirty
    }

    pub fn compose(&mut self, now: Instant) -> Frame {
        let indicator = self.animator.sample(now);
        let area = self.area();
        let selected = self.control.selected();
        let label = self
            .control
            .items()
            .get(selected)
            .map(String::as_str)
            .unwrap_or("");
        let scroll = self.viewport.can_scroll().then(|| {
            (
                self.viewport.offset.round() as u16,
                self.viewport.max_offset().round() as u16,
            )
        });
        let scene = Scene {
            control: &self.control,
            indicator,
            viewport: &self.viewport,
            palette: &self.palette,
            area,
            status: StatusContext {
                selected,
                count: self.control.item_count(),
                label,
                last_callback: self.last_callback.get(),
                forward_only: self.control.appearance().forward_only,
                scroll,
                animating: self.animator.is_animating(),
            },
            help: Some(HELP),
        };
        scene.compose(self.size.0, self.size.1)
    }

    pub fn render_to<W: Write>(&mut self, out: &mut W, now: Instant) -> anyhow::Result<RenderStats> {
        let frame = self.compose(now);
        let stats = self.renderer.render_to(frame, out)?;
        self.dirty = false;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_config::ConfigFile;
    use std::time::Duration;

    fn items() -> Vec<String> {
        core_config::DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect()
    }

    fn app(cols: u16) -> App {
        App::new(items(), Config::default(), Overrides::default(), (cols, 10))
    }

    fn key(c: char) -> KeyToken {
        KeyToken::Char(c)
    }

    #[test]
    fn arrows_select_without_callback() {
        let mut a = app(80);
        let now = Instant::now();
        a.handle_key(&KeyToken::Named(NamedKey::Right), now);
        a.handle_key(&KeyToken::Named(NamedKey::Right), now);
        assert_eq!(a.control().selected(), 2);
        assert_eq!(a.last_callback(), None);
        a.handle_key(&KeyToken::Named(NamedKey::Left), now);
        assert_eq!(a.control().selected(), 1);
        a.handle_key(&KeyToken::Named(NamedKey::End), now);
        assert_eq!(a.control().selected(), 4);
        // next at the last segment is a no-op
        a.handle_key(&key('n'), now);
        assert_eq!(a.control().selected(), 4);
    }

    #[test]
    fn digit_taps_fire_callback() {
        let mut a = app(80);
        let now = Instant::now();
        a.handle_key(&key('3'), now);
        assert_eq!(a.control().selected(), 2);
        assert_eq!(a.last_callback(), Some(2));
        a.handle_key(&key('9'), now);
        assert_eq!(a.control().selected(), 2);
    }

    #[test]
    fn quit_keys() {
        let mut a = app(80);
        let now = Instant::now();
        assert_eq!(a.handle_key(&key('q'), now), LoopControl::Quit);
        assert_eq!(
            a.handle_key(&KeyToken::Named(NamedKey::Esc), now),
            LoopControl::Quit
        );
        let ctrl_c = KeyToken::chord(key('c'), ModMask::CTRL);
        assert_eq!(a.handle_key(&ctrl_c, now), LoopControl::Quit);
        assert_eq!(a.handle_key(&key('c'), now), LoopControl::Continue);
    }

    #[test]
    fn forward_only_override_blocks_larger_taps() {
        let overrides = Overrides {
            forward_only: true,
            width_style: None,
        };
        let mut a = App::new(items(), Config::default(), overrides, (80, 10));
        a.select_initial(2);
        let now = Instant::now();
        a.handle_key(&key('4'), now);
        assert_eq!(a.control().selected(), 2);
        a.handle_key(&key('1'), now);
        assert_eq!(a.control().selected(), 0);
        assert_eq!(a.last_callback(), Some(0));
    }

    #[test]
    fn click_on_segment_taps_it() {
        let mut a = app(80);
        let area = a.area();
        let target = a.control().layout().frame(3).map(|f| f.offset).unwrap_or(0.0);
        let ev = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + target as u16 + 1,
            row: area.y,
            mods: ModMask::empty(),
        };
        a.handle_mouse(&ev, Instant::now());
        assert_eq!(a.control().selected(), 3);
        assert_eq!(a.last_callback(), Some(3));
    }

    #[test]
    fn narrow_terminal_scrolls_and_reveals() {
        let mut a = app(20);
        assert!(a.viewport().can_scroll());
        a.handle_key(&KeyToken::Named(NamedKey::End), Instant::now());
        assert_eq!(a.viewport().offset, a.viewport().max_offset());
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            mods: ModMask::empty(),
        };
        let before = a.viewport().offset;
        a.handle_mouse(&wheel, Instant::now());
        assert_eq!(a.viewport().offset, before - WHEEL_STEP);
    }

    #[test]
    fn resize_relayouts_and_clamps_offset() {
        let config = Config {
            file: ConfigFile {
                segments: core_config::SegmentsConfig {
                    horizontal_offset: 4,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut a = App::new(items(), config, Overrides::default(), (80, 10));
        assert_eq!(a.area().x, 4);
        assert_eq!(a.control().layout().available_width(), 72.0);
        a.handle_resize(6, 10, Instant::now());
        assert_eq!(a.area().x, 2);
        assert_eq!(a.control().layout().available_width(), 2.0);
        assert!(a.is_dirty());
    }

    #[test]
    fn oversized_indicator_height_fits_the_terminal() {
        let config = Config {
            file: ConfigFile {
                indicator: core_config::IndicatorConfig {
                    height: u16::MAX,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let mut a = App::new(items(), config, Overrides::default(), (80, 24));
        // 24 rows minus top margin, label, blank, status and help.
        assert_eq!(a.area().height, 1 + 19);

        let now = Instant::now();
        let frame = a.compose(now);
        assert!(frame.line_text(22).starts_with("[1/5] One"));
        assert!(frame.line_text(23).starts_with("←/→ select"));
        let mut out = Vec::new();
        assert!(a.render_to(&mut out, now).is_ok());

        a.handle_resize(80, 8, now);
        assert_eq!(a.area().height, 1 + 3);
    }

    #[test]
    fn ticks_drive_animation_to_completion() {
        let mut a = app(80);
        let t0 = Instant::now();
        a.select(3, t0);
        assert!(a.animator().is_animating());
        assert!(a.handle_tick(t0 + Duration::from_millis(16)));
        a.handle_tick(t0 + Duration::from_secs(1));
        assert!(!a.animator().is_animating());
        assert_eq!(a.animator().shown(), a.control().indicator());
    }

    #[test]
    fn render_writes_strip_and_status() {
        let mut a = app(60);
        a.select_initial(2);
        let mut out = Vec::new();
        let stats = a.render_to(&mut out, Instant::now()).unwrap();
        assert!(stats.full);
        assert!(!a.is_dirty());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Three"));
        assert!(text.contains("[3/5] Three"));
    }
}
