//! Column width of one grapheme cluster.
//!
//! [`egc_width`] is the only place cluster widths are decided. The label
//! measurer and the frame composer both go through it, so a label occupies
//! exactly the columns the allocator reserved for it.
//!
//! `unicode-width` handles single scalars. Multi-scalar clusters are scanned
//! once into [`Shape`] and resolved by the emoji sequence rules below. Symbols
//! from Misc Symbols and Dingbats (`✓`, `✈`, `⚙`) stay narrow unless a VS16
//! asks for emoji presentation, which is how terminals paint them.

use unicode_width::UnicodeWidthChar;

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';

fn in_range(c: char, lo: char, hi: char) -> bool {
    (lo..=hi).contains(&c)
}

fn is_pictograph(c: char) -> bool {
    in_range(c, '\u{1F300}', '\u{1FAFF}')
}

fn is_text_symbol(c: char) -> bool {
    in_range(c, '\u{2600}', '\u{27BF}')
}

fn is_flag_letter(c: char) -> bool {
    in_range(c, '\u{1F1E6}', '\u{1F1FF}')
}

fn is_skin_tone(c: char) -> bool {
    in_range(c, '\u{1F3FB}', '\u{1F3FF}')
}

fn is_mark(c: char) -> bool {
    [
        ('\u{0300}', '\u{036F}'),
        ('\u{1AB0}', '\u{1AFF}'),
        ('\u{1DC0}', '\u{1DFF}'),
        ('\u{20D0}', '\u{20FF}'),
        ('\u{FE20}', '\u{FE2F}'),
    ]
    .iter()
    .any(|&(lo, hi)| in_range(c, lo, hi))
}

fn scalar_width(c: char) -> u16 {
    c.width().unwrap_or(1) as u16
}

/// What a multi-scalar cluster contains.
#[derive(Debug, Default)]
struct Shape {
    scalars: usize,
    pictographic: usize,
    flag_letters: usize,
    zwj: bool,
    vs16: bool,
    skin_tone: bool,
    keycap_base: bool,
    ends_in_keycap: bool,
    /// Width of the first non-mark scalar.
    base: Option<u16>,
    any_wide: bool,
}

impl Shape {
    fn scan(egc: &str) -> Self {
        let mut shape = Shape::default();
        for c in egc.chars() {
            shape.scalars += 1;
            shape.ends_in_keycap = c == KEYCAP;
            shape.pictographic += usize::from(is_pictograph(c) || is_text_symbol(c));
            shape.flag_letters += usize::from(is_flag_letter(c));
            shape.zwj |= c == ZWJ;
            shape.vs16 |= c == VS16;
            shape.skin_tone |= is_skin_tone(c);
            shape.keycap_base |= c.is_ascii_digit() || c == '#' || c == '*';
            shape.any_wide |= scalar_width(c) == 2;
            if shape.base.is_none() && !is_mark(c) {
                shape.base = Some(if is_pictograph(c) { 2 } else { scalar_width(c) });
            }
        }
        shape
    }

    fn is_emoji(&self) -> bool {
        let keycap = self.ends_in_keycap && self.keycap_base;
        let flag = self.scalars == 2 && self.flag_letters == 2;
        let zwj_sequence = self.zwj && self.pictographic >= 2;
        let toned = self.skin_tone && self.pictographic >= 1;
        let presented = self.vs16 && self.pictographic == 1;
        keycap || flag || zwj_sequence || toned || presented
    }

    fn width(&self) -> u16 {
        if self.is_emoji() || self.any_wide || self.base == Some(2) {
            2
        } else {
            1
        }
    }
}

/// Columns occupied by `egc`, which must be a single grapheme cluster.
/// The empty string is 0 wide.
pub fn egc_width(egc: &str) -> u16 {
    let mut chars = egc.chars();
    let width = match (chars.next(), chars.next()) {
        (None, _) => return 0,
        (Some(c), None) if c.is_ascii() => 1,
        (Some(c), None) if is_pictograph(c) => 2,
        (Some(c), None) => scalar_width(c).clamp(1, 2),
        _ => Shape::scan(egc).width(),
    };
    // Lone pictographs or flag letters some tables still call narrow.
    if width == 1 && egc.chars().any(|c| is_pictograph(c) || is_flag_letter(c)) {
        2
    } else {
        width
    }
}
