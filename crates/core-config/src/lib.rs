//! Configuration loading and parsing.
//!
//! Parses `segbar.toml` (or an override path provided by the binary) into a
//! [`ConfigFile`]. Every section is optional; missing fields take terminal
//! friendly defaults (one-column inset, one-row indicator). Unknown fields are
//! ignored. A file that fails to parse falls back to defaults with a warning.
//!
//! The raw horizontal offset and indicator height are kept as written;
//! [`Config::apply_context`] clamps them against the current terminal size so
//! at least one column stays available for segments and the strip never runs
//! past the status rows. Both are re-clamped on resize.

use anyhow::Result;
use core_model::{
    Appearance, CompletedMarker, Font, IndicatorPosition, Rgb, TextStyle, WidthStyle,
};
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "segbar.toml";

/// Items shown when neither the command line nor the config file lists any.
pub const DEFAULT_ITEMS: [&str; 5] = ["One", "Two", "Three", "fouraaaaa", "five"];

/// Rows the screen needs besides the indicator: top margin, label row, the
/// blank row and status line below the strip, and the help line.
pub const RESERVED_ROWS: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionConfig {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidthStyleConfig {
    #[default]
    Fixed,
    Dynamic,
}

impl From<PositionConfig> for IndicatorPosition {
    fn from(p: PositionConfig) -> Self {
        match p {
            PositionConfig::Top => IndicatorPosition::Top,
            PositionConfig::Bottom => IndicatorPosition::Bottom,
        }
    }
}

impl From<WidthStyleConfig> for WidthStyle {
    fn from(w: WidthStyleConfig) -> Self {
        match w {
            WidthStyleConfig::Fixed => WidthStyle::Fixed,
            WidthStyleConfig::Dynamic => WidthStyle::Dynamic,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndicatorConfig {
    #[serde(default = "IndicatorConfig::default_color")]
    pub color: String,
    #[serde(default)]
    pub position: PositionConfig,
    #[serde(default = "IndicatorConfig::default_height")]
    pub height: u16,
    #[serde(default)]
    pub width_style: WidthStyleConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            position: PositionConfig::default(),
            height: Self::default_height(),
            width_style: WidthStyleConfig::default(),
        }
    }
}

impl IndicatorConfig {
    fn default_color() -> String {
        "cyan".to_string()
    }
    const fn default_height() -> u16 {
        1
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SegmentsConfig {
    #[serde(default = "SegmentsConfig::default_inset")]
    pub inset: u16,
    #[serde(default)]
    pub horizontal_offset: u16,
    #[serde(default)]
    pub forward_only: bool,
    /// Glyph drawn on completed segments; absent disables markers.
    #[serde(default)]
    pub completed_marker: Option<String>,
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            inset: Self::default_inset(),
            horizontal_offset: 0,
            forward_only: false,
            completed_marker: None,
        }
    }
}

impl SegmentsConfig {
    const fn default_inset() -> u16 {
        1
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FontConfig {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub size: Option<f32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TextStyleConfig {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub font: FontConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StyleConfig {
    #[serde(default = "StyleConfig::default_normal")]
    pub normal: TextStyleConfig,
    #[serde(default = "StyleConfig::default_selected")]
    pub selected: TextStyleConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            normal: Self::default_normal(),
            selected: Self::default_selected(),
        }
    }
}

impl StyleConfig {
    fn default_normal() -> TextStyleConfig {
        TextStyleConfig {
            color: Some("gray".to_string()),
            ..TextStyleConfig::default()
        }
    }
    fn default_selected() -> TextStyleConfig {
        TextStyleConfig {
            color: Some("white".to_string()),
            bold: true,
            ..TextStyleConfig::default()
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnimationConfig {
    #[serde(default = "AnimationConfig::default_duration_ms")]
    pub duration_ms: u64,
    /// Interval of the tick source that samples the animation.
    #[serde(default = "AnimationConfig::default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: Self::default_duration_ms(),
            tick_ms: Self::default_tick_ms(),
        }
    }
}

impl AnimationConfig {
    const fn default_duration_ms() -> u64 {
        250
    }
    const fn default_tick_ms() -> u64 {
        16
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub segments: SegmentsConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    /// Horizontal offset after clamping to the terminal width.
    pub effective_horizontal_offset: u16,
    /// Indicator rows after clamping to the terminal height. `None` until a
    /// context is applied.
    pub effective_indicator_height: Option<u16>,
}

/// Local `segbar.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("segbar").join(CONFIG_FILE);
    }
    PathBuf::from(CONFIG_FILE)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            effective_horizontal_offset: file.segments.horizontal_offset,
            effective_indicator_height: None,
            file,
        }),
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

/// `#rrggbb` or one of the basic color names.
pub fn parse_color(spec: &str) -> Option<Rgb> {
    let s = spec.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?));
    }
    let rgb = match s.to_ascii_lowercase().as_str() {
        "black" => Rgb::BLACK,
        "white" => Rgb::WHITE,
        "red" => Rgb::new(205, 49, 49),
        "green" => Rgb::new(13, 188, 121),
        "yellow" => Rgb::new(229, 229, 16),
        "blue" => Rgb::new(36, 114, 200),
        "magenta" => Rgb::new(188, 63, 188),
        "cyan" => Rgb::new(17, 168, 205),
        "gray" | "grey" => Rgb::new(160, 160, 160),
        _ => return None,
    };
    Some(rgb)
}

fn color_or(spec: Option<&str>, fallback: Rgb, field: &'static str) -> Rgb {
    let Some(spec) = spec else {
        return fallback;
    };
    parse_color(spec).unwrap_or_else(|| {
        warn!(target: "config", field, value = spec, "invalid_color_using_default");
        fallback
    })
}

fn text_style(cfg: &TextStyleConfig, fallback: Rgb, field: &'static str) -> TextStyle {
    let base = Font::default();
    let font = Font::new(
        cfg.font.family.clone().unwrap_or(base.family),
        cfg.font.size.filter(|s| *s > 0.0).unwrap_or(base.size),
    )
    .with_bold(cfg.bold);
    TextStyle {
        font,
        color: color_or(cfg.color.as_deref(), fallback, field),
    }
}

impl Config {
    /// Clamp the horizontal offset so at least one column remains for
    /// segments. Returns the available width in columns.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.segments.horizontal_offset;
        let max = ctx.viewport_columns.saturating_sub(1) / 2;
        let clamped = raw.min(max);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                viewport_columns = ctx.viewport_columns,
                "horizontal_offset_clamped"
            );
        }
        self.effective_horizontal_offset = clamped;

        let raw_height = self.file.indicator.height.max(1);
        let max_height = ctx.viewport_rows.saturating_sub(RESERVED_ROWS).max(1);
        let height = raw_height.min(max_height);
        if height != raw_height {
            info!(
                target: "config",
                raw = raw_height,
                clamped = height,
                viewport_rows = ctx.viewport_rows,
                "indicator_height_clamped"
            );
        }
        self.effective_indicator_height = Some(height);

        ctx.viewport_columns.saturating_sub(clamped.saturating_mul(2))
    }

    /// Re-clamp after a resize. True when the effective offset or indicator
    /// height changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> bool {
        let prev = (self.effective_horizontal_offset, self.effective_indicator_height);
        self.apply_context(ctx);
        prev != (self.effective_horizontal_offset, self.effective_indicator_height)
    }

    /// Configured items, or the built-in sample set.
    pub fn items(&self) -> Vec<String> {
        if self.file.items.is_empty() {
            DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect()
        } else {
            self.file.items.clone()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.file.animation.tick_ms.max(1))
    }

    /// Build the control's option set. Columns are the layout unit.
    pub fn appearance(&self) -> Appearance {
        let f = &self.file;
        let completed_marker = f
            .segments
            .completed_marker
            .as_deref()
            .filter(|g| !g.is_empty())
            .map(|glyph| CompletedMarker::new(glyph, f32::from(core_text::display_width(glyph))));
        Appearance {
            indicator_color: color_or(Some(&f.indicator.color), Rgb::BLACK, "indicator.color"),
            indicator_position: f.indicator.position.into(),
            indicator_height: f32::from(
                self.effective_indicator_height
                    .unwrap_or(f.indicator.height)
                    .max(1),
            ),
            width_style: f.indicator.width_style.into(),
            horizontal_inset: f32::from(f.segments.inset),
            horizontal_offset: f32::from(self.effective_horizontal_offset),
            forward_only: f.segments.forward_only,
            completed_marker,
            normal_text: text_style(&f.style.normal, Rgb::BLACK, "style.normal.color"),
            selected_text: text_style(&f.style.selected, Rgb::BLACK, "style.selected.color"),
            animation: Duration::from_millis(f.animation.duration_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    fn load_str(toml: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), toml).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file.segments.inset, 1);
        assert_eq!(cfg.file.indicator.height, 1);
        assert_eq!(cfg.items(), DEFAULT_ITEMS.map(String::from).to_vec());
    }

    #[test]
    fn parses_all_sections() {
        let cfg = load_str(
            r##"
items = ["Cart", "Shipping", "Pay"]

[indicator]
color = "#ff8800"
position = "top"
height = 2
width_style = "dynamic"

[segments]
inset = 3
horizontal_offset = 2
forward_only = true
completed_marker = "✓"

[style.selected]
color = "yellow"
bold = true
font = { family = "Menlo", size = 13.0 }

[animation]
duration_ms = 120
"##,
        );
        assert_eq!(cfg.items(), vec!["Cart", "Shipping", "Pay"]);
        let a = cfg.appearance();
        assert_eq!(a.indicator_color, Rgb::new(0xff, 0x88, 0x00));
        assert_eq!(a.indicator_position, IndicatorPosition::Top);
        assert_eq!(a.indicator_height, 2.0);
        assert_eq!(a.width_style, WidthStyle::Dynamic);
        assert_eq!(a.horizontal_inset, 3.0);
        assert_eq!(a.horizontal_offset, 2.0);
        assert!(a.forward_only);
        assert_eq!(a.completed_marker, Some(CompletedMarker::new("✓", 1.0)));
        assert_eq!(a.selected_text.font, Font::new("Menlo", 13.0).with_bold(true));
        assert_eq!(a.animation, Duration::from_millis(120));
        // untouched section keeps its defaults
        assert_eq!(a.normal_text.color, Rgb::new(160, 160, 160));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let cfg = load_str("[segments]\ninset = 2\nfuture_knob = 7\n[mystery]\nx = 1\n");
        assert_eq!(cfg.file.segments.inset, 2);
    }

    #[test]
    fn parse_error_falls_back_to_defaults_with_warning() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[indicator]\nposition = \"sideways\"\n").unwrap();
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let out = capture(|| cfg = Some(load_from(Some(path)).unwrap()));
        let cfg = cfg.unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file.indicator.position, PositionConfig::Bottom);
        assert!(out.contains("WARN config:"), "log was: {out}");
        assert!(out.contains("config_parse_failed_using_defaults"));
    }

    #[test]
    fn invalid_color_uses_fallback() {
        let cfg = load_str("[indicator]\ncolor = \"#12\"\n");
        let mut a = None;
        let out = capture(|| a = Some(cfg.appearance()));
        assert_eq!(a.unwrap().indicator_color, Rgb::BLACK);
        assert!(out.contains("invalid_color_using_default"));
    }

    #[test]
    fn parse_color_accepts_hex_and_names() {
        assert_eq!(parse_color("#000000"), Some(Rgb::BLACK));
        assert_eq!(parse_color(" White "), Some(Rgb::WHITE));
        assert_eq!(parse_color("grey"), parse_color("gray"));
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("#ééé"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn available_width_subtracts_offset_on_both_sides() {
        let mut cfg = load_str("[segments]\nhorizontal_offset = 3\n");
        assert_eq!(cfg.apply_context(ConfigContext::new(80, 24)), 74);
        assert_eq!(cfg.effective_horizontal_offset, 3);
    }

    #[test]
    fn offset_clamped_on_narrow_terminal_and_logged() {
        let mut cfg = load_str("[segments]\nhorizontal_offset = 10\n");
        let mut available = 0;
        let out = capture(|| available = cfg.apply_context(ConfigContext::new(11, 24)));
        // max offset = (11 - 1) / 2 = 5 -> one column left
        assert_eq!(cfg.effective_horizontal_offset, 5);
        assert_eq!(available, 1);
        assert!(out.contains("INFO config:"));
        assert!(out.contains("horizontal_offset_clamped"));
    }

    #[test]
    fn recompute_reports_changes_only() {
        let mut cfg = load_str("[segments]\nhorizontal_offset = 6\n");
        cfg.apply_context(ConfigContext::new(80, 24));
        assert!(cfg.recompute_with_context(ConfigContext::new(9, 24)));
        assert_eq!(cfg.effective_horizontal_offset, 4);
        assert!(!cfg.recompute_with_context(ConfigContext::new(10, 24)));
        assert!(cfg.recompute_with_context(ConfigContext::new(100, 24)));
        assert_eq!(cfg.effective_horizontal_offset, 6);
    }

    #[test]
    fn oversized_indicator_height_clamped_to_terminal_rows() {
        let mut cfg = load_str(&format!("[indicator]\nheight = {}\n", u16::MAX));
        let out = capture(|| {
            cfg.apply_context(ConfigContext::new(80, 24));
        });
        assert_eq!(cfg.effective_indicator_height, Some(24 - RESERVED_ROWS));
        assert_eq!(cfg.appearance().indicator_height, 19.0);
        assert!(out.contains("indicator_height_clamped"));

        // A terminal too short for the chrome still keeps one indicator row.
        assert!(cfg.recompute_with_context(ConfigContext::new(80, 3)));
        assert_eq!(cfg.appearance().indicator_height, 1.0);
    }

    #[test]
    fn indicator_height_unclamped_before_context() {
        let cfg = load_str("[indicator]\nheight = 3\n");
        assert_eq!(cfg.effective_indicator_height, None);
        assert_eq!(cfg.appearance().indicator_height, 3.0);
    }

    #[test]
    fn empty_marker_glyph_disables_markers() {
        let cfg = load_str("[segments]\ncompleted_marker = \"\"\n");
        assert!(cfg.appearance().completed_marker.is_none());
    }
}
