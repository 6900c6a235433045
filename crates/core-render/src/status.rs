//! Status line composition.
//!
//! Format: `[<n>/<count>] <label>` followed by optional ` | `-separated
//! parts: last callback value, forward-only flag, scroll position and an
//! animation marker.
//!
//! Two stages, so callers can inspect or drop parts before formatting:
//! 1. `compose_status` produces an ordered vector of `StatusSegment` items.
//! 2. `format_status` renders those segments into the final string.

/// What the status line needs to know about the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusContext<'a> {
    pub selected: usize, // 0-based
    pub count: usize,
    pub label: &'a str,
    /// Value delivered to the index-changed callback most recently.
    pub last_callback: Option<usize>,
    pub forward_only: bool,
    /// Viewport scroll (offset, max) in columns; `None` when content fits.
    pub scroll: Option<(u16, u16)>,
    pub animating: bool,
}

/// Discrete status line segments (order-sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    /// 1-based selection position.
    Position { selected_1: usize, count: usize },
    Label(&'a str),
    Callback(usize),
    ForwardOnly,
    Scroll { offset: u16, max: u16 },
    Animating,
    Empty,
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(6);
    if ctx.count == 0 {
        out.push(StatusSegment::Empty);
        return out;
    }
    out.push(StatusSegment::Position {
        selected_1: ctx.selected + 1,
        count: ctx.count,
    });
    out.push(StatusSegment::Label(ctx.label));
    if let Some(v) = ctx.last_callback {
        out.push(StatusSegment::Callback(v));
    }
    if ctx.forward_only {
        out.push(StatusSegment::ForwardOnly);
    }
    if let Some((offset, max)) = ctx.scroll {
        out.push(StatusSegment::Scroll { offset, max });
    }
    if ctx.animating {
        out.push(StatusSegment::Animating);
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    use std::fmt::Write as _;
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::Position { selected_1, count } => {
                let _ = write!(s, "[{selected_1}/{count}]");
            }
            StatusSegment::Label(l) => {
                s.push(' ');
                s.push_str(l);
            }
            StatusSegment::Callback(v) => {
                let _ = write!(s, " | changed → {v}");
            }
            StatusSegment::ForwardOnly => s.push_str(" | forward-only"),
            StatusSegment::Scroll { offset, max } => {
                let _ = write!(s, " | scroll {offset}/{max}");
            }
            StatusSegment::Animating => s.push_str(" | ~"),
            StatusSegment::Empty => s.push_str("[no segments]"),
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_plain_position() {
        let ctx = StatusContext {
            selected: 1,
            count: 5,
            label: "Two",
            ..StatusContext::default()
        };
        assert_eq!(build_status(&ctx), "[2/5] Two");
    }

    #[test]
    fn builds_every_part_in_order() {
        let ctx = StatusContext {
            selected: 0,
            count: 3,
            label: "One",
            last_callback: Some(0),
            forward_only: true,
            scroll: Some((4, 12)),
            animating: true,
        };
        assert_eq!(
            build_status(&ctx),
            "[1/3] One | changed → 0 | forward-only | scroll 4/12 | ~"
        );
    }

    #[test]
    fn empty_control() {
        let seg = compose_status(&StatusContext::default());
        assert_eq!(seg, vec![StatusSegment::Empty]);
        assert_eq!(format_status(&seg), "[no segments]");
    }
}
