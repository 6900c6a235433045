use core_model::IndicatorGeometry;
use std::time::Duration;

/// Start/end geometry for the indicator. The control never animates; it hands
/// this to whichever animator the host runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorTransition {
    pub from: IndicatorGeometry,
    pub to: IndicatorGeometry,
    pub animated: bool,
    pub duration: Duration,
}

impl IndicatorTransition {
    pub fn instant(from: IndicatorGeometry, to: IndicatorGeometry) -> Self {
        Self {
            from,
            to,
            animated: false,
            duration: Duration::ZERO,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Content-space span the scroll viewport should bring into view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSpan {
    pub start: f32,
    pub end: f32,
}

/// Result of applying a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionUpdate {
    pub index: usize,
    pub transition: IndicatorTransition,
    pub reveal: RevealSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Forward-only policy rejected a larger index.
    ForwardOnly,
    /// Tap landed on an index that does not exist.
    OutOfRange,
}

/// Result of a tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    Ignored(IgnoreReason),
    Applied {
        changed: bool,
        update: SelectionUpdate,
    },
}

impl TapOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, TapOutcome::Applied { changed: true, .. })
    }

    pub fn update(&self) -> Option<&SelectionUpdate> {
        match self {
            TapOutcome::Applied { update, .. } => Some(update),
            TapOutcome::Ignored(_) => None,
        }
    }
}
