//! NFC normalization and grapheme segmentation of label text.
//!
//! A [`Segmented`] label owns its normalized text; each [`Cluster`] is a byte
//! range into it plus a column width. Ranges are ordered and contiguous, so
//! the clusters always reassemble the normalized text.

use crate::egc_width;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub range: Range<usize>,
    /// Terminal columns.
    pub width: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segmented {
    text: String,
    clusters: Vec<Cluster>,
}

impl Segmented {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Each cluster's text with its width, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> + '_ {
        self.clusters
            .iter()
            .map(|c| (&self.text[c.range.clone()], c.width))
    }

    /// Sum of cluster widths, saturating.
    pub fn width(&self) -> u16 {
        self.clusters
            .iter()
            .fold(0u16, |acc, c| acc.saturating_add(c.width))
    }
}

pub fn segment(input: &str) -> Segmented {
    let text: String = input.nfc().collect();
    let clusters = text
        .grapheme_indices(true)
        .map(|(at, g)| Cluster {
            range: at..at + g.len(),
            width: egc_width(g),
        })
        .collect();
    Segmented { text, clusters }
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> u16 {
    segment(text).width()
}
