//! Writing text in visual order

use crate::class::is_bidi_control;
use crate::options::ReorderOptions;
use crate::runs::LevelRun;
use crate::tables;

/// Produce the visual-order string for a paragraph or line.
///
/// `runs` are the view's runs in visual order and `trail` marks the second
/// unit of each surrogate pair, which is written once with its first unit.
/// Characters of RTL runs are written in reverse and, with `mirroring`, are
/// replaced by their mirrored glyph (L4). `remove_bidi_controls` drops
/// explicit formatting characters and marks; `output_reverse` writes the
/// whole result right to left.
pub(crate) fn write_reordered(
    text: &[char],
    trail: &[bool],
    runs: &[LevelRun],
    options: ReorderOptions,
) -> String {
    let mut visual: Vec<char> = Vec::with_capacity(text.len());

    for run in runs {
        let chars = (run.start..run.limit)
            .filter(|&pos| pos == run.start || !trail.get(pos).copied().unwrap_or(false))
            .map(|pos| text[pos])
            .filter(|&c| !(options.remove_bidi_controls && is_bidi_control(c)));

        if run.level.is_rtl() {
            let mirror = |c| if options.mirroring { tables::mirror_char(c) } else { c };
            visual.extend(chars.rev().map(mirror));
        } else {
            visual.extend(chars);
        }
    }

    if options.output_reverse {
        visual.iter().rev().collect()
    } else {
        visual.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ParaLevel, ParagraphOptions};
    use crate::paragraph::Paragraph;
    use crate::view::BidiView;

    fn reorder(text: &str, para_level: ParaLevel, options: ReorderOptions) -> String {
        Paragraph::new(text, ParagraphOptions::new().with_para_level(para_level)).write_reordered(options)
    }

    #[test]
    fn test_ltr_unchanged() {
        assert_eq!(reorder("hello world", ParaLevel::Ltr, ReorderOptions::new()), "hello world");
    }

    #[test]
    fn test_rtl_reversed() {
        assert_eq!(reorder("אבג", ParaLevel::DefaultLtr, ReorderOptions::new()), "גבא");
    }

    #[test]
    fn test_mixed_with_mirroring() {
        let options = ReorderOptions::new().with_mirroring(true);
        assert_eq!(reorder("אבג (דה) ef", ParaLevel::Ltr, options), "(הד) גבא ef");
    }

    #[test]
    fn test_without_mirroring() {
        assert_eq!(reorder("אבג (דה) ef", ParaLevel::Ltr, ReorderOptions::new()), ")הד( גבא ef");
    }

    #[test]
    fn test_remove_bidi_controls() {
        let options = ReorderOptions::new().with_remove_bidi_controls(true);
        assert_eq!(reorder("a\u{200F}b\u{2067}c\u{2069}", ParaLevel::Ltr, options), "abc");
    }

    #[test]
    fn test_output_reverse() {
        let options = ReorderOptions::new().with_output_reverse(true);
        assert_eq!(reorder("abc", ParaLevel::Ltr, options), "cba");
    }

    #[test]
    fn test_numbers_in_rtl() {
        assert_eq!(reorder("אב 12", ParaLevel::DefaultLtr, ReorderOptions::new()), "12 בא");
    }

    #[test]
    fn test_surrogate_pair_written_once() {
        let units: Vec<u16> = "אב\u{1D400}".encode_utf16().collect();
        let para = Paragraph::from_utf16(&units, ParagraphOptions::new().with_para_level(ParaLevel::Rtl));
        assert_eq!(para.write_reordered(ReorderOptions::new()), "\u{1D400}בא");
    }

    #[test]
    fn test_astral_rtl_run_keeps_chars_whole() {
        // U+10900 PHOENICIAN LETTER ALF is R
        let units: Vec<u16> = "a \u{10900}\u{10901}".encode_utf16().collect();
        let para = Paragraph::from_utf16(&units, ParagraphOptions::new().with_para_level(ParaLevel::Ltr));
        assert_eq!(para.len(), 6);
        assert_eq!(para.write_reordered(ReorderOptions::new()), "a \u{10901}\u{10900}");
    }
}
