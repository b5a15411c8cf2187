//! Paragraph splitting (rule P1)

use std::ops::Range;

use crate::class::BidiClass;

/// Split text into paragraph ranges.
///
/// Each paragraph ends just after a paragraph separator (class B); CR LF
/// counts as one separator. Ranges are contiguous and cover the whole text.
/// Empty text yields a single empty paragraph.
pub fn split(text: &[char]) -> Vec<Range<usize>> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        let c = text[i];
        i += 1;
        if BidiClass::of(c) == BidiClass::B {
            if c == '\r' && text.get(i) == Some(&'\n') {
                i += 1;
            }
            paragraphs.push(start..i);
            start = i;
        }
    }

    if start < text.len() || paragraphs.is_empty() {
        paragraphs.push(start..text.len());
    }

    paragraphs
}
