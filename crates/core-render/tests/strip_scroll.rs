use core_model::{Appearance, IndicatorGeometry};
use core_render::animation::IndicatorAnimator;
use core_render::strip::{StripArea, compose_strip, hit_test};
use core_render::style::StripPalette;
use core_render::viewport::HorizontalViewport;
use core_render::{CellFlags, Frame};
use core_state::SegmentedControl;
use core_text::CellMeasurer;
use proptest::prelude::*;
use std::time::{Duration, Instant};

const ITEMS: [&str; 5] = ["One", "Two", "Three", "fouraaaaa", "five"];

fn control(width: f32) -> SegmentedControl<CellMeasurer> {
    SegmentedControl::new(ITEMS, CellMeasurer)
        .with_appearance(Appearance {
            horizontal_inset: 1.0,
            indicator_height: 1.0,
            ..Appearance::default()
        })
        .with_container_width(width)
}

#[test]
fn selecting_offscreen_segment_reveals_it() {
    // 5 × 11 columns of content in a 20 column strip.
    let mut c = control(20.0);
    let mut vp = HorizontalViewport::new(20.0, c.layout().content_width());
    assert_eq!(vp.content, 55.0);
    let update = c.set_selected_index(4, false);
    assert!(vp.reveal(update.reveal.start, update.reveal.end));
    assert_eq!(vp.offset, 35.0);

    let area = StripArea::for_appearance(0, 0, 20, c.appearance());
    let mut f = Frame::new(20, area.height);
    compose_strip(&mut f, &c, c.indicator(), &vp, &StripPalette::default(), &area);
    assert_eq!(
        f.columns_with(1, CellFlags::INDICATOR),
        (9..20).collect::<Vec<u16>>()
    );
    assert_eq!(hit_test(&c, &vp, &area, 10, 0), Some(4));
    assert_eq!(hit_test(&c, &vp, &area, 0, 0), Some(3));
}

#[test]
fn animator_frames_move_bar_monotonically() {
    let mut c = control(60.0);
    let mut anim = IndicatorAnimator::new(c.indicator());
    let t0 = Instant::now();
    let update = c.set_selected_index(3, true);
    anim.start(&update.transition, t0);
    let mut last = anim.shown().x;
    for step in 1..=5u64 {
        let g = anim.sample(t0 + Duration::from_millis(step * 50));
        assert!(g.x >= last);
        last = g.x;
    }
    assert_eq!(anim.shown(), c.indicator());
    assert!(!anim.is_animating());
}

proptest! {
    #[test]
    fn indicator_cells_stay_inside_strip(
        width in 8u16..80,
        selected in 0usize..5,
        scroll in 0f32..60.0,
        offset in -30f32..90.0,
    ) {
        let mut c = control(f32::from(width));
        c.set_selected_index(selected, false);
        let mut vp = HorizontalViewport::new(f32::from(width), c.layout().content_width());
        vp.scroll_by(scroll);
        let area = StripArea::for_appearance(3, 0, width, c.appearance());
        let mut f = Frame::new(width + 6, area.height);
        let g = IndicatorGeometry::new(offset, 7.0);
        compose_strip(&mut f, &c, g, &vp, &StripPalette::default(), &area);
        for x in f.columns_with(1, CellFlags::INDICATOR) {
            prop_assert!(x >= area.x && x < area.right());
        }
        for x in 0..f.width {
            let cell = f.cell(x, 0).unwrap();
            if cell.cluster() != " " && cell.is_leader() {
                prop_assert!(x >= area.x && x < area.right());
            }
        }
    }
}
