//! Lines within a resolved paragraph (rule L1)

use crate::class::BidiClass;
use crate::level::{Direction, Level};
use crate::options::ReorderOptions;
use crate::paragraph::{Paragraph, ParagraphInfo};
use crate::reorder;
use crate::runs::{self, LogicalRun, RunLayout, VisualRun};
use crate::view::BidiView;
use crate::{BidiError, Result};

/// Apply L1 to a paragraph treated as a single line.
///
/// Segment and paragraph separators, whitespace and isolate formatting
/// characters before them, and whitespace at the end are reset to the
/// paragraph level. Uses the original classes, not the resolved types.
pub(crate) fn reset_whitespace(classes: &[BidiClass], levels: &mut [Level], para_level: Level) {
    let mut reset = true;
    for (class, level) in classes.iter().zip(levels.iter_mut()).rev() {
        match class {
            BidiClass::B | BidiClass::S => {
                *level = para_level;
                reset = true;
            }
            c if c.is_trailing_whitespace() => {
                if reset {
                    *level = para_level;
                }
            }
            _ => reset = false,
        }
    }
}

/// Start of the whitespace run that ends a line
pub(crate) fn trailing_whitespace_start(classes: &[BidiClass]) -> usize {
    classes
        .iter()
        .rposition(|c| !(c.is_trailing_whitespace() || matches!(c, BidiClass::B | BidiClass::S)))
        .map_or(0, |pos| pos + 1)
}

/// A line of a [`Paragraph`].
///
/// Borrows the paragraph's levels; only the trailing whitespace of the line
/// is reset to the paragraph level. All indices are relative to the line.
#[derive(Debug, Clone)]
pub struct Line<'p> {
    paragraph: &'p Paragraph,
    start: usize,
    limit: usize,
    info: ParagraphInfo,
    trailing_start: usize,
    direction: Direction,
    layout: RunLayout,
}

impl<'p> Line<'p> {
    pub(crate) fn new(paragraph: &'p Paragraph, start: usize, limit: usize) -> Result<Self> {
        let length = paragraph.len();
        if start > limit || limit > length {
            return Err(BidiError::InvalidLine { start, limit, length });
        }

        let info = paragraph.info_containing(start);
        if limit > info.limit {
            return Err(BidiError::LineCrossesParagraph { start, limit });
        }

        let trailing_start = trailing_whitespace_start(&paragraph.classes()[start..limit]);
        let para_level = info.level;
        let line_level = |i: usize| {
            if i >= trailing_start { para_level } else { paragraph.resolved_levels()[start + i] }
        };

        let len = limit - start;
        let direction = Direction::from_levels((0..len).map(line_level), para_level);
        let segment = runs::logical_runs((0..len).map(line_level), 0, para_level);
        let layout = RunLayout::new(vec![segment], &paragraph.trail()[start..limit]);

        tracing::trace!("Line {}..{} in paragraph {}: {}", start, limit, info.index, direction);

        Ok(Self {
            paragraph,
            start,
            limit,
            info,
            trailing_start,
            direction,
            layout,
        })
    }

    /// Start of the line in the paragraph
    pub fn start(&self) -> usize {
        self.start
    }

    /// End of the line in the paragraph (exclusive)
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The paragraph this line was cut from
    pub fn parent(&self) -> &'p Paragraph {
        self.paragraph
    }

    /// Index of the containing paragraph in the parent
    pub fn paragraph_index(&self) -> usize {
        self.info.index
    }

    fn level(&self, index: usize) -> Level {
        if index >= self.trailing_start {
            self.info.level
        } else {
            self.paragraph.resolved_levels()[self.start + index]
        }
    }

    fn as_paragraph_info(&self) -> ParagraphInfo {
        ParagraphInfo {
            index: 0,
            start: 0,
            limit: self.len(),
            level: self.info.level,
            dir: self.direction,
        }
    }
}

impl BidiView for Line<'_> {
    fn text(&self) -> &[char] {
        &self.paragraph.text()[self.start..self.limit]
    }

    fn para_level(&self) -> Level {
        self.info.level
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn len(&self) -> usize {
        self.limit - self.start
    }

    fn level_at(&self, index: usize) -> Result<Level> {
        if index >= self.len() {
            return Err(BidiError::out_of_range("character index", index, self.len()));
        }
        Ok(self.level(index))
    }

    fn levels(&self) -> Vec<Level> {
        (0..self.len()).map(|i| self.level(i)).collect()
    }

    fn count_paragraphs(&self) -> usize {
        1
    }

    fn paragraph(&self, offset: usize) -> Result<ParagraphInfo> {
        if offset >= self.len() {
            return Err(BidiError::out_of_range("character offset", offset, self.len()));
        }
        Ok(self.as_paragraph_info())
    }

    fn paragraph_by_index(&self, index: usize) -> Result<ParagraphInfo> {
        if index != 0 {
            return Err(BidiError::out_of_range("paragraph index", index, 1));
        }
        Ok(self.as_paragraph_info())
    }

    fn count_runs(&self) -> usize {
        self.layout.count_runs()
    }

    fn visual_run(&self, index: usize) -> Result<VisualRun> {
        self.layout.visual_run(index)
    }

    fn logical_run(&self, offset: usize) -> Result<LogicalRun> {
        self.layout.logical_run(offset)
    }

    fn visual_index(&self, logical: usize) -> Result<usize> {
        self.layout.visual_index(logical)
    }

    fn logical_index(&self, visual: usize) -> Result<usize> {
        self.layout.logical_index(visual)
    }

    fn visual_map(&self) -> &[usize] {
        self.layout.index().visual_map()
    }

    fn logical_map(&self) -> &[usize] {
        self.layout.index().logical_map()
    }

    fn set_line(&self, start: usize, limit: usize) -> Result<Line<'_>> {
        let length = self.len();
        if start > limit || limit > length {
            return Err(BidiError::InvalidLine { start, limit, length });
        }
        Line::new(self.paragraph, self.start + start, self.start + limit)
    }

    fn write_reordered(&self, options: ReorderOptions) -> String {
        let trail = &self.paragraph.trail()[self.start..self.limit];
        reorder::write_reordered(self.text(), trail, self.layout.visual_runs(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{ParaLevel, ParagraphOptions};

    fn classes(s: &str) -> Vec<BidiClass> {
        s.chars().map(BidiClass::of).collect()
    }

    fn paragraph(s: &str, para_level: ParaLevel) -> Paragraph {
        Paragraph::new(s, ParagraphOptions::new().with_para_level(para_level))
    }

    #[test]
    fn test_reset_whitespace() {
        let cls = classes("ab\tc  ");
        let mut levels = vec![Level(2); cls.len()];
        reset_whitespace(&cls, &mut levels, Level::RTL);
        let numbers: Vec<u8> = levels.iter().map(|l| l.number()).collect();
        assert_eq!(numbers, vec![2, 2, 1, 2, 1, 1]);
    }

    #[test]
    fn test_reset_whitespace_before_tab() {
        let cls = classes("a \t b");
        let mut levels = vec![Level(2); cls.len()];
        reset_whitespace(&cls, &mut levels, Level::LTR);
        let numbers: Vec<u8> = levels.iter().map(|l| l.number()).collect();
        assert_eq!(numbers, vec![2, 0, 0, 2, 2]);
    }

    #[test]
    fn test_trailing_whitespace_start() {
        assert_eq!(trailing_whitespace_start(&classes("ab  ")), 2);
        assert_eq!(trailing_whitespace_start(&classes("ab")), 2);
        assert_eq!(trailing_whitespace_start(&classes("   ")), 0);
        assert_eq!(trailing_whitespace_start(&classes("a \n")), 1);
    }

    #[test]
    fn test_line_resets_trailing_space() {
        // "אב גד": the middle space is RTL in the paragraph, but ends line 0..3
        let para = paragraph("abc אב גד", ParaLevel::Ltr);
        assert_eq!(para.level_at(6).unwrap(), Level::RTL);
        let line = para.set_line(4, 7).unwrap();
        assert_eq!(line.levels(), vec![Level::RTL, Level::RTL, Level::LTR]);
    }

    #[test]
    fn test_line_of_line() {
        let para = paragraph("abc def ghi", ParaLevel::Ltr);
        let line = para.set_line(4, 11).unwrap();
        let inner = line.set_line(0, 3).unwrap();
        assert_eq!(inner.start(), 4);
        assert_eq!(inner.limit(), 7);
        assert_eq!(inner.text().iter().collect::<String>(), "def");
    }

    #[test]
    fn test_line_bounds() {
        let para = paragraph("abc", ParaLevel::Ltr);
        assert!(matches!(para.set_line(2, 1), Err(BidiError::InvalidLine { .. })));
        assert!(matches!(para.set_line(0, 4), Err(BidiError::InvalidLine { .. })));
        let line = para.set_line(1, 2).unwrap();
        assert!(line.set_line(0, 2).is_err());
        assert!(para.set_line(3, 3).unwrap().is_empty());
    }

    #[test]
    fn test_line_crossing_paragraphs() {
        let para = paragraph("ab\ncd", ParaLevel::DefaultLtr);
        let err = para.set_line(1, 4).unwrap_err();
        assert!(err.is_range_error());
        assert!(para.set_line(0, 3).is_ok());
        assert_eq!(para.set_line(3, 5).unwrap().paragraph_index(), 1);
    }

    #[test]
    fn test_line_over_utf16_pair() {
        // "a " then two R letters from the SMP, cut after the space
        let units: Vec<u16> = "a \u{10900}\u{10901}".encode_utf16().collect();
        let para = Paragraph::from_utf16(&units, ParagraphOptions::new());
        let line = para.set_line(2, 6).unwrap();
        assert_eq!(line.len(), 4);
        assert_eq!(line.logical_map(), &[2, 3, 0, 1]);
        assert_eq!(line.write_reordered(ReorderOptions::new()), "\u{10901}\u{10900}");
    }
}
