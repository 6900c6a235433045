//! Segment width allocation.
//!
//! A layout pass turns the item labels into an index-addressed array of
//! [`SegmentFrame`]s. The selection tracker and the renderer only ever look
//! segments up by index in that array; nothing holds references into a
//! render tree.
//!
//! Allocation policy:
//! 1. Natural width = measured label + `2 × inset` + icon width (when a
//!    completed marker is configured), floored at [`MIN_SEGMENT_WIDTH`].
//! 2. Natural widths fit the available width: equal-fit. The even share is
//!    `remaining / pool_len`. The largest pool member (lowest index on ties)
//!    that exceeds the share gets its natural width plus up to one inset of
//!    slack and leaves the pool; repeat until the largest member fits the
//!    share, then every remaining member gets the share. Widths sum to the
//!    available width.
//! 3. Natural widths overflow: every segment gets the maximum natural width
//!    and the host scrolls horizontally.
//!
//! Invariants:
//! * `frames[i].index == i` and offsets are cumulative from 0.
//! * Every width is `>= MIN_SEGMENT_WIDTH` and `>=` its natural width.
//! * Slack never pushes the remaining pool below its natural total, so the
//!    equal-fit branch never overflows.

use crate::{IndicatorGeometry, WidthStyle};
use core_text::{Font, TextMeasurer};
use tracing::debug;

/// Smallest width a segment may occupy.
pub const MIN_SEGMENT_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationBranch {
    /// No items.
    Empty,
    /// Content fits; available width distributed with largest-first capping.
    EqualFit,
    /// Content overflows; uniform maximum natural width.
    Overflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub widths: Vec<f32>,
    pub branch: AllocationBranch,
}

/// Natural width of every label, in order.
pub fn natural_widths<S, M>(
    labels: &[S],
    font: &Font,
    horizontal_inset: f32,
    icon_width: Option<f32>,
    measurer: &M,
) -> Vec<f32>
where
    S: AsRef<str>,
    M: TextMeasurer + ?Sized,
{
    let inset = horizontal_inset.max(0.0);
    let icon = icon_width.unwrap_or(0.0).max(0.0);
    labels
        .iter()
        .map(|label| {
            let text = measurer.measure(label.as_ref(), font).max(0.0);
            (text + 2.0 * inset + icon).max(MIN_SEGMENT_WIDTH)
        })
        .collect()
}

/// Distribute `available` across segments with the given natural widths.
pub fn allocate(natural: &[f32], horizontal_inset: f32, available: f32) -> Allocation {
    if natural.is_empty() {
        return Allocation {
            widths: Vec::new(),
            branch: AllocationBranch::Empty,
        };
    }

    let total: f32 = natural.iter().sum();
    if total > available {
        let max = natural.iter().copied().fold(MIN_SEGMENT_WIDTH, f32::max);
        return Allocation {
            widths: vec![max; natural.len()],
            branch: AllocationBranch::Overflow,
        };
    }

    let slack = horizontal_inset.max(0.0);
    let mut widths = vec![0.0f32; natural.len()];
    let mut pool: Vec<usize> = (0..natural.len()).collect();
    let mut remaining = available;
    let mut pool_natural = total;

    while pool.len() > 1 {
        let share = remaining / pool.len() as f32;
        // Largest natural width; on ties the lowest index compares greater.
        let Some((pos, idx)) = pool
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| natural[*a].total_cmp(&natural[*b]).then(b.cmp(a)))
        else {
            break;
        };
        let nat = natural[idx];
        if nat <= share {
            break;
        }
        let headroom = (remaining - pool_natural).max(0.0);
        let width = nat + slack.min(headroom);
        widths[idx] = width;
        remaining -= width;
        pool_natural -= nat;
        pool.remove(pos);
    }

    let share = remaining / pool.len() as f32;
    for idx in pool {
        widths[idx] = share;
    }

    Allocation {
        widths,
        branch: AllocationBranch::EqualFit,
    }
}

/// Measure and allocate in one step; one width per label, same order.
pub fn compute_widths<S, M>(
    labels: &[S],
    font: &Font,
    horizontal_inset: f32,
    icon_width: Option<f32>,
    available: f32,
    measurer: &M,
) -> Vec<f32>
where
    S: AsRef<str>,
    M: TextMeasurer + ?Sized,
{
    let natural = natural_widths(labels, font, horizontal_inset, icon_width, measurer);
    allocate(&natural, horizontal_inset, available).widths
}

/// Geometry record for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFrame {
    pub index: usize,
    pub label: String,
    /// Measured label width (no inset, no icon).
    pub text_width: f32,
    pub natural_width: f32,
    /// Leading edge in content coordinates.
    pub offset: f32,
    pub width: f32,
}

impl SegmentFrame {
    pub fn end(&self) -> f32 {
        self.offset + self.width
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.offset && x < self.end()
    }
}

/// Where a segment's content sits inside its slot. Content (marker + label)
/// is centered in the slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFrame {
    pub marker_x: Option<f32>,
    pub text_x: f32,
    pub text_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLayout {
    frames: Vec<SegmentFrame>,
    branch: AllocationBranch,
    available_width: f32,
    icon_width: f32,
}

impl Default for SegmentLayout {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            branch: AllocationBranch::Empty,
            available_width: 0.0,
            icon_width: 0.0,
        }
    }
}

impl SegmentLayout {
    /// Run a full layout pass.
    pub fn compute<S, M>(
        labels: &[S],
        font: &Font,
        horizontal_inset: f32,
        icon_width: Option<f32>,
        available: f32,
        measurer: &M,
    ) -> Self
    where
        S: AsRef<str>,
        M: TextMeasurer + ?Sized,
    {
        let text_widths: Vec<f32> = labels
            .iter()
            .map(|l| measurer.measure(l.as_ref(), font).max(0.0))
            .collect();
        let natural = natural_widths(labels, font, horizontal_inset, icon_width, measurer);
        let Allocation { widths, branch } = allocate(&natural, horizontal_inset, available);

        let mut offset = 0.0f32;
        let frames: Vec<SegmentFrame> = labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let frame = SegmentFrame {
                    index,
                    label: label.as_ref().to_string(),
                    text_width: text_widths[index],
                    natural_width: natural[index],
                    offset,
                    width: widths[index],
                };
                offset += widths[index];
                frame
            })
            .collect();

        let layout = Self {
            frames,
            branch,
            available_width: available,
            icon_width: icon_width.unwrap_or(0.0).max(0.0),
        };
        debug!(
            target: "layout",
            count = layout.len(),
            branch = ?layout.branch,
            available,
            content_width = layout.content_width(),
            "layout_pass"
        );
        layout
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[SegmentFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&SegmentFrame> {
        self.frames.get(index)
    }

    pub fn widths(&self) -> Vec<f32> {
        self.frames.iter().map(|f| f.width).collect()
    }

    pub fn branch(&self) -> AllocationBranch {
        self.branch
    }

    pub fn available_width(&self) -> f32 {
        self.available_width
    }

    /// Total width of all segments (may exceed the available width).
    pub fn content_width(&self) -> f32 {
        self.frames.last().map(SegmentFrame::end).unwrap_or(0.0)
    }

    /// Hit-test a content-space x coordinate.
    pub fn segment_at(&self, x: f32) -> Option<usize> {
        self.frames.iter().position(|f| f.contains(x))
    }

    /// Content placement for segment `index`; `marker_shown` reserves the
    /// marker's width before the label.
    pub fn label_frame(&self, index: usize, marker_shown: bool) -> Option<LabelFrame> {
        let frame = self.frames.get(index)?;
        let marker = if marker_shown { self.icon_width } else { 0.0 };
        let content = frame.text_width + marker;
        let start = frame.offset + ((frame.width - content) / 2.0).max(0.0);
        Some(LabelFrame {
            marker_x: marker_shown.then_some(start),
            text_x: start + marker,
            text_width: frame.text_width,
        })
    }

    /// Indicator placement for the selected segment.
    pub fn indicator_geometry(&self, index: usize, style: WidthStyle) -> Option<IndicatorGeometry> {
        match style {
            WidthStyle::Fixed => {
                let frame = self.frames.get(index)?;
                Some(IndicatorGeometry::new(frame.offset, frame.width))
            }
            WidthStyle::Dynamic => {
                let label = self.label_frame(index, false)?;
                Some(IndicatorGeometry::new(label.text_x, label.text_width))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{AdvanceMeasurer, CellMeasurer};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_labels_yield_empty_result() {
        let labels: [&str; 0] = [];
        let w = compute_widths(&labels, &Font::default(), 5.0, None, 300.0, &CellMeasurer);
        assert!(w.is_empty());
        assert_eq!(allocate(&[], 5.0, 300.0).branch, AllocationBranch::Empty);
    }

    #[test]
    fn natural_width_adds_insets_and_icon() {
        let n = natural_widths(&["abc"], &Font::default(), 2.0, Some(3.0), &CellMeasurer);
        assert_eq!(n, vec![3.0 + 4.0 + 3.0]);
    }

    #[test]
    fn natural_width_never_below_minimum() {
        let n = natural_widths(&[""], &Font::default(), 0.0, None, &CellMeasurer);
        assert_eq!(n, vec![MIN_SEGMENT_WIDTH]);
    }

    #[test]
    fn even_split_when_everything_fits() {
        let a = allocate(&[32.5, 32.5, 47.5], 5.0, 300.0);
        assert_eq!(a.branch, AllocationBranch::EqualFit);
        assert_eq!(a.widths, vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn long_label_is_capped_at_natural_plus_slack() {
        // share = 100, 150 > 100 -> 150 + 5, rest share (300 - 155) / 2
        let a = allocate(&[150.0, 20.0, 20.0], 5.0, 300.0);
        assert_eq!(a.widths, vec![155.0, 72.5, 72.5]);
        let sum: f32 = a.widths.iter().sum();
        assert_eq!(sum, 300.0);
    }

    #[test]
    fn capping_repeats_while_largest_exceeds_share() {
        // share 25: 40 capped -> 45, remaining 55 / 3 = 18.33: 30 capped -> 35,
        // remaining 20 / 2 = 10 fits both 10s.
        let a = allocate(&[10.0, 40.0, 30.0, 10.0], 5.0, 100.0);
        assert_eq!(a.widths, vec![10.0, 45.0, 35.0, 10.0]);
    }

    #[test]
    fn slack_is_bounded_by_headroom() {
        // Exactly fits: no room for slack, every width equals natural.
        let a = allocate(&[60.0, 20.0, 20.0], 5.0, 100.0);
        assert_eq!(a.widths, vec![60.0, 20.0, 20.0]);
    }

    #[test]
    fn ties_cap_lowest_index_first() {
        let a = allocate(&[50.0, 50.0, 10.0], 2.0, 120.0);
        // share 40: index 0 capped first -> 52; remaining 68 / 2 = 34: index 1
        // capped -> 50 + min(2, 68 - 60) = 52; last gets 16.
        assert_eq!(a.widths, vec![52.0, 52.0, 16.0]);
    }

    #[test]
    fn overflow_uses_max_natural_for_all() {
        let a = allocate(&[30.0, 80.0, 40.0], 5.0, 100.0);
        assert_eq!(a.branch, AllocationBranch::Overflow);
        assert_eq!(a.widths, vec![80.0, 80.0, 80.0]);
    }

    #[test]
    fn single_item_wider_than_available_overflows() {
        let a = allocate(&[120.0], 5.0, 100.0);
        assert_eq!(a.branch, AllocationBranch::Overflow);
        assert_eq!(a.widths, vec![120.0]);
    }

    #[test]
    fn zero_available_width_overflows_gracefully() {
        let w = compute_widths(&["a", "bb"], &Font::default(), 1.0, None, 0.0, &CellMeasurer);
        assert_eq!(w, vec![4.0, 4.0]);
    }

    #[test]
    fn layout_offsets_are_cumulative() {
        let layout = SegmentLayout::compute(
            &["One", "Two", "Three"],
            &Font::default(),
            5.0,
            None,
            300.0,
            &AdvanceMeasurer::default(),
        );
        let offsets: Vec<f32> = layout.frames().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0.0, 100.0, 200.0]);
        assert_eq!(layout.content_width(), 300.0);
        assert_eq!(layout.segment_at(150.0), Some(1));
        assert_eq!(layout.segment_at(300.0), None);
        assert_eq!(layout.segment_at(-1.0), None);
    }

    #[test]
    fn label_is_centered_in_slot() {
        let layout =
            SegmentLayout::compute(&["ab", "c"], &Font::default(), 1.0, None, 20.0, &CellMeasurer);
        // 10 columns each; "ab" centered -> starts at 4
        let lf = layout.label_frame(0, false).unwrap();
        assert_eq!(lf.text_x, 4.0);
        assert_eq!(lf.text_width, 2.0);
        assert!(lf.marker_x.is_none());
    }

    #[test]
    fn marker_precedes_label() {
        let layout = SegmentLayout::compute(
            &["ab", "c"],
            &Font::default(),
            1.0,
            Some(2.0),
            20.0,
            &CellMeasurer,
        );
        let lf = layout.label_frame(0, true).unwrap();
        // content 4 wide in a 10 wide slot -> starts at 3
        assert_eq!(lf.marker_x, Some(3.0));
        assert_eq!(lf.text_x, 5.0);
    }

    #[test]
    fn indicator_geometry_per_style() {
        let layout =
            SegmentLayout::compute(&["ab", "c"], &Font::default(), 1.0, None, 20.0, &CellMeasurer);
        assert_eq!(
            layout.indicator_geometry(1, WidthStyle::Fixed),
            Some(IndicatorGeometry::new(10.0, 10.0))
        );
        assert_eq!(
            layout.indicator_geometry(1, WidthStyle::Dynamic),
            Some(IndicatorGeometry::new(14.5, 1.0))
        );
        assert_eq!(layout.indicator_geometry(2, WidthStyle::Fixed), None);
    }
}
