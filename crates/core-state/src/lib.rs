//! Selection tracker: the stateful half of the segmented control.
//!
//! `SegmentedControl` owns the item labels, the applied [`Appearance`], the
//! current [`SegmentLayout`] and the selected index. Layout is recomputed only
//! on invalidation (container width, item list or style change); selection
//! changes reuse the cached frames.
//!
//! Invariants (hold after every public call):
//! * `selected < item_count()` whenever the control has items; `0` otherwise.
//! * `indicator()` equals `layout.indicator_geometry(selected, width_style)`
//!   (or `IndicatorGeometry::ZERO` with no items).
//! * The index-changed callback fires only from `report_tap`, exactly once per
//!   tap that changes the index, and before the tap's transition is returned.
//!
//! Out-of-range `set_selected_index` is a caller bug and panics; taps come from
//! end users and never panic.

mod transition;

pub use transition::{IgnoreReason, IndicatorTransition, RevealSpan, SelectionUpdate, TapOutcome};

use core_model::{Appearance, IndicatorGeometry, SegmentLayout};
use core_text::{CellMeasurer, TextMeasurer};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("attempting to select segment {index} but the control has {count} segments")]
    OutOfRange { index: usize, count: usize },
}

/// Visual state of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentState {
    pub selected: bool,
    /// Completed marker visible (index before the selection).
    pub marker: bool,
}

type IndexChanged = Box<dyn FnMut(usize)>;

pub struct SegmentedControl<M = CellMeasurer> {
    items: Vec<String>,
    appearance: Appearance,
    measurer: M,
    container_width: f32,
    layout: SegmentLayout,
    selected: usize,
    indicator: IndicatorGeometry,
    on_index_changed: Option<IndexChanged>,
}

impl<M: TextMeasurer> SegmentedControl<M> {
    pub fn new<I, S>(items: I, measurer: M) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut control = Self {
            items: items.into_iter().map(Into::into).collect(),
            appearance: Appearance::default(),
            measurer,
            container_width: 0.0,
            layout: SegmentLayout::default(),
            selected: 0,
            indicator: IndicatorGeometry::ZERO,
            on_index_changed: None,
        };
        control.relayout();
        control
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.apply_style(appearance);
        self
    }

    pub fn with_container_width(mut self, width: f32) -> Self {
        self.set_container_width(width);
        self
    }

    /// Register the index-changed callback, replacing any previous one.
    pub fn on_index_changed(&mut self, f: impl FnMut(usize) + 'static) {
        self.on_index_changed = Some(Box::new(f));
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn indicator(&self) -> IndicatorGeometry {
        self.indicator
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    pub fn segment_state(&self, index: usize) -> SegmentState {
        SegmentState {
            selected: index == self.selected && index < self.items.len(),
            marker: self.appearance.completed_marker.is_some() && index < self.selected,
        }
    }

    pub fn segment_states(&self) -> Vec<SegmentState> {
        (0..self.items.len())
            .map(|i| self.segment_state(i))
            .collect()
    }

    /// Apply a complete option set. Re-measures labels and snaps the indicator.
    pub fn apply_style(&mut self, appearance: Appearance) -> IndicatorTransition {
        debug!(
            target: "selection",
            width_style = ?appearance.width_style,
            forward_only = appearance.forward_only,
            marker = appearance.completed_marker.is_some(),
            "apply_style"
        );
        self.appearance = appearance;
        self.relayout()
    }

    /// Container resize. Lays out again only when the width changed.
    pub fn set_container_width(&mut self, width: f32) -> Option<IndicatorTransition> {
        let width = width.max(0.0);
        if width == self.container_width {
            return None;
        }
        self.container_width = width;
        Some(self.relayout())
    }

    /// Replace the item list. A selection that no longer exists resets to 0
    /// without invoking the callback.
    pub fn set_items<I, S>(&mut self, items: I) -> IndicatorTransition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        if self.selected >= self.items.len() {
            debug!(
                target: "selection",
                previous = self.selected,
                count = self.items.len(),
                "selection_reset"
            );
            self.selected = 0;
        }
        self.relayout()
    }

    /// Select `index`. Panics when `index` is out of range.
    pub fn set_selected_index(&mut self, index: usize, animated: bool) -> SelectionUpdate {
        match self.try_set_selected_index(index, animated) {
            Ok(update) => update,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_set_selected_index(
        &mut self,
        index: usize,
        animated: bool,
    ) -> Result<SelectionUpdate, SelectionError> {
        let count = self.items.len();
        if index >= count {
            return Err(SelectionError::OutOfRange { index, count });
        }
        self.selected = index;

        let from = self.indicator;
        let to = self.target_geometry();
        self.indicator = to;

        let transition = IndicatorTransition {
            from,
            to,
            animated,
            duration: if animated {
                self.appearance.animation
            } else {
                std::time::Duration::ZERO
            },
        };
        let reveal = self
            .layout
            .frame(index)
            .map(|f| RevealSpan {
                start: f.offset,
                end: f.end(),
            })
            .unwrap_or(RevealSpan {
                start: 0.0,
                end: 0.0,
            });
        trace!(
            target: "selection",
            index,
            animated,
            x = to.x,
            width = to.width,
            "selection_applied"
        );
        Ok(SelectionUpdate {
            index,
            transition,
            reveal,
        })
    }

    /// Tap on segment `index`.
    pub fn report_tap(&mut self, index: usize) -> TapOutcome {
        if index >= self.items.len() {
            debug!(target: "selection", index, count = self.items.len(), "tap_out_of_range");
            return TapOutcome::Ignored(IgnoreReason::OutOfRange);
        }
        if self.appearance.forward_only && index > self.selected {
            debug!(target: "selection", index, current = self.selected, "tap_forward_only");
            return TapOutcome::Ignored(IgnoreReason::ForwardOnly);
        }

        let changed = index != self.selected;
        self.selected = index;
        if changed {
            if let Some(cb) = self.on_index_changed.as_mut() {
                cb(index);
            }
            debug!(target: "selection", index, "index_changed");
        }

        let update = self.set_selected_index(index, true);
        TapOutcome::Applied { changed, update }
    }

    fn target_geometry(&self) -> IndicatorGeometry {
        self.layout
            .indicator_geometry(self.selected, self.appearance.width_style)
            .unwrap_or(IndicatorGeometry::ZERO)
    }

    fn relayout(&mut self) -> IndicatorTransition {
        let available = self.appearance.available_width(self.container_width);
        self.layout = SegmentLayout::compute(
            &self.items,
            self.appearance.measure_font(),
            self.appearance.horizontal_inset,
            self.appearance.icon_width(),
            available,
            &self.measurer,
        );
        let from = self.indicator;
        self.indicator = self.target_geometry();
        IndicatorTransition::instant(from, self.indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{CompletedMarker, WidthStyle};

    fn control(items: &[&str]) -> SegmentedControl {
        SegmentedControl::new(items.iter().copied(), CellMeasurer).with_container_width(60.0)
    }

    #[test]
    fn initial_selection_is_zero() {
        let c = control(&["a", "b"]);
        assert_eq!(c.selected(), 0);
        assert!(c.segment_state(0).selected);
        assert!(!c.segment_state(1).selected);
    }

    #[test]
    fn empty_control_is_inert() {
        let mut c = control(&[]);
        assert_eq!(c.indicator(), IndicatorGeometry::ZERO);
        assert_eq!(c.report_tap(0), TapOutcome::Ignored(IgnoreReason::OutOfRange));
        assert!(c.try_set_selected_index(0, false).is_err());
        assert!(c.segment_states().is_empty());
    }

    #[test]
    fn try_set_reports_typed_error() {
        let mut c = control(&["a", "b"]);
        let err = c.try_set_selected_index(2, true).unwrap_err();
        assert_eq!(err, SelectionError::OutOfRange { index: 2, count: 2 });
        assert_eq!(c.selected(), 0);
    }

    #[test]
    #[should_panic(expected = "attempting to select segment 5")]
    fn set_selected_out_of_range_panics() {
        let mut c = control(&["a", "b"]);
        c.set_selected_index(5, false);
    }

    #[test]
    fn markers_precede_selection() {
        let appearance = Appearance {
            completed_marker: Some(CompletedMarker::new("✓", 2.0)),
            horizontal_inset: 1.0,
            ..Appearance::default()
        };
        let mut c = control(&["a", "b", "c", "d"]).with_appearance(appearance);
        c.set_selected_index(2, false);
        let markers: Vec<bool> = c.segment_states().iter().map(|s| s.marker).collect();
        assert_eq!(markers, vec![true, true, false, false]);
    }

    #[test]
    fn no_markers_without_marker_config() {
        let mut c = control(&["a", "b", "c"]);
        c.set_selected_index(2, false);
        assert!(c.segment_states().iter().all(|s| !s.marker));
    }

    #[test]
    fn resize_relayouts_and_snaps_indicator() {
        let mut c = control(&["a", "b"]);
        c.set_selected_index(1, false);
        assert_eq!(c.indicator(), IndicatorGeometry::new(30.0, 30.0));
        let t = c.set_container_width(100.0).expect("width changed");
        assert!(!t.animated);
        assert_eq!(t.to, IndicatorGeometry::new(50.0, 50.0));
        assert!(c.set_container_width(100.0).is_none());
    }

    #[test]
    fn set_items_resets_vanished_selection() {
        let mut c = control(&["a", "b", "c"]);
        c.set_selected_index(2, false);
        c.set_items(["x", "y"]);
        assert_eq!(c.selected(), 0);
        c.set_selected_index(1, false);
        c.set_items(["x", "y", "z"]);
        assert_eq!(c.selected(), 1);
    }

    #[test]
    fn apply_style_switches_indicator_mode() {
        let mut c = control(&["ab", "c"]);
        assert_eq!(c.indicator(), IndicatorGeometry::new(0.0, 30.0));
        let t = c.apply_style(Appearance {
            width_style: WidthStyle::Dynamic,
            ..Appearance::default()
        });
        // "ab" centered in a 30 wide slot
        assert_eq!(t.to, IndicatorGeometry::new(14.0, 2.0));
    }
}
