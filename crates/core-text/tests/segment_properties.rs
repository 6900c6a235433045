use core_text::{CellMeasurer, Font, TextMeasurer, display_width, segment};
use proptest::prelude::*;

fn label() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "a", "Z", "7", " ", "é", "e\u{0301}", "日", "本", "😀", "👍🏽", "🇺🇸", "✓", "✈\u{FE0F}",
        ]),
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn clusters_tile_the_normalized_label(text in label()) {
        let s = segment(&text);
        let mut next = 0usize;
        for c in s.clusters() {
            prop_assert_eq!(c.range.start, next);
            prop_assert!(c.width >= 1);
            next = c.range.end;
        }
        prop_assert_eq!(next, s.text().len());
        let joined: String = s.iter().map(|(g, _)| g).collect();
        prop_assert_eq!(joined.as_str(), s.text());
    }

    #[test]
    fn cell_measure_matches_cluster_widths(text in label()) {
        let total: u16 = segment(&text).iter().map(|(_, w)| w).sum();
        prop_assert_eq!(display_width(&text), total);
        prop_assert_eq!(CellMeasurer.measure(&text, &Font::default()), f32::from(total));
    }
}
