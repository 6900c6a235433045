//! Horizontal viewport over the segment content.
//!
//! When the layout overflows, segments are wider in total than the visible
//! strip and the host scrolls. The viewport tracks the scroll offset in
//! content coordinates and maps between content x and strip columns.
//!
//! Guarantees:
//! * `0 <= offset <= max_offset()` after every mutation.
//! * `reveal` moves the window by the minimum amount that shows the span (or
//!   its leading edge when the span is wider than the window).

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HorizontalViewport {
    pub offset: f32,
    pub width: f32,
    pub content: f32,
}

impl HorizontalViewport {
    pub fn new(width: f32, content: f32) -> Self {
        Self {
            offset: 0.0,
            width: width.max(0.0),
            content: content.max(0.0),
        }
    }

    pub fn max_offset(&self) -> f32 {
        (self.content - self.width).max(0.0)
    }

    pub fn can_scroll(&self) -> bool {
        self.max_offset() > 0.0
    }

    /// Update window and content extents after a relayout.
    pub fn set_bounds(&mut self, width: f32, content: f32) {
        self.width = width.max(0.0);
        self.content = content.max(0.0);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    /// Scroll so `[start, end)` is visible. Returns whether the offset moved.
    pub fn reveal(&mut self, start: f32, end: f32) -> bool {
        let before = self.offset;
        if start < self.offset || end - start > self.width {
            self.offset = start;
        } else if end > self.offset + self.width {
            self.offset = end - self.width;
        }
        self.clamp();
        self.offset != before
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let before = self.offset;
        self.offset += delta;
        self.clamp();
        self.offset != before
    }

    /// Content x to strip column (may be negative or past the window).
    pub fn to_screen(&self, x: f32) -> f32 {
        x - self.offset
    }

    /// Strip column to content x.
    pub fn to_content(&self, column: f32) -> f32 {
        column + self.offset
    }

    pub fn is_visible(&self, x: f32) -> bool {
        let s = self.to_screen(x);
        s >= 0.0 && s < self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_content_never_scrolls() {
        let mut vp = HorizontalViewport::new(40.0, 30.0);
        assert!(!vp.can_scroll());
        assert!(!vp.scroll_by(5.0));
        assert!(!vp.reveal(20.0, 30.0));
        assert_eq!(vp.offset, 0.0);
    }

    #[test]
    fn reveal_moves_minimally() {
        let mut vp = HorizontalViewport::new(20.0, 100.0);
        assert!(vp.reveal(30.0, 40.0));
        assert_eq!(vp.offset, 20.0);
        assert!(!vp.reveal(25.0, 35.0));
        assert!(vp.reveal(5.0, 15.0));
        assert_eq!(vp.offset, 5.0);
    }

    #[test]
    fn reveal_wider_than_window_shows_leading_edge() {
        let mut vp = HorizontalViewport::new(10.0, 100.0);
        vp.reveal(50.0, 80.0);
        assert_eq!(vp.offset, 50.0);
    }

    #[test]
    fn shrinking_content_clamps_offset() {
        let mut vp = HorizontalViewport::new(20.0, 100.0);
        vp.scroll_by(70.0);
        assert_eq!(vp.offset, 70.0);
        vp.set_bounds(20.0, 50.0);
        assert_eq!(vp.offset, 30.0);
        vp.scroll_by(-100.0);
        assert_eq!(vp.offset, 0.0);
    }

    #[test]
    fn coordinate_mapping_round_trips() {
        let mut vp = HorizontalViewport::new(20.0, 100.0);
        vp.scroll_by(12.0);
        assert_eq!(vp.to_screen(15.0), 3.0);
        assert_eq!(vp.to_content(3.0), 15.0);
        assert!(vp.is_visible(12.0));
        assert!(!vp.is_visible(32.0));
    }
}
