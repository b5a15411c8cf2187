//! Resolved bidi text

use serde::Serialize;

use crate::class::BidiClass;
use crate::context::Context;
use crate::level::{Direction, Level};
use crate::line::{self, Line};
use crate::options::{ParagraphOptions, ReorderOptions};
use crate::reorder;
use crate::resolve;
use crate::runs::{self, LogicalRun, RunLayout, VisualRun};
use crate::split;
use crate::view::BidiView;
use crate::{BidiError, Result};

/// One paragraph of a resolved text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphInfo {
    /// Position among the paragraphs of the text
    pub index: usize,
    /// First character
    pub start: usize,
    /// One past the last character, including the separator
    pub limit: usize,
    /// Paragraph embedding level
    pub level: Level,
    /// Overall direction of the paragraph's levels
    pub dir: Direction,
}

/// Text with fully resolved embedding levels.
///
/// The text may hold several paragraphs; each is resolved on its own and
/// reordered on its own. Indices are `char` positions for `&str` and UTF-8
/// input and code unit positions for UTF-16 input, where both units of a
/// surrogate pair carry the same character and level.
#[derive(Debug, Clone)]
pub struct Paragraph {
    text: Box<[char]>,
    classes: Box<[BidiClass]>,
    levels: Box<[Level]>,
    trail: Box<[bool]>,
    paragraphs: Vec<ParagraphInfo>,
    direction: Direction,
    layout: RunLayout,
}

impl Paragraph {
    /// Resolve `text` with the given options
    pub fn new(text: &str, options: ParagraphOptions) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let classes = chars.iter().map(|&c| BidiClass::of(c)).collect();
        let wide = vec![false; chars.len()];
        Self::build(chars, classes, wide, &options)
    }

    /// Resolve UTF-16 code units.
    ///
    /// Positions are code units. An unpaired surrogate is kept as one
    /// position of class L and reads back as U+FFFD.
    pub fn from_utf16(units: &[u16], options: ParagraphOptions) -> Self {
        let mut chars = Vec::with_capacity(units.len());
        let mut classes = Vec::with_capacity(units.len());
        let mut wide = Vec::with_capacity(units.len());

        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    chars.push(c);
                    classes.push(BidiClass::of(c));
                    wide.push(c.len_utf16() == 2);
                }
                Err(_) => {
                    chars.push(char::REPLACEMENT_CHARACTER);
                    classes.push(BidiClass::L);
                    wide.push(false);
                }
            }
        }

        Self::build(chars, classes, wide, &options)
    }

    /// Resolve UTF-8 bytes; malformed sequences are rejected
    pub fn from_utf8(bytes: &[u8], options: ParagraphOptions) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| BidiError::Input(e.to_string()))?;
        Ok(Self::new(text, options))
    }

    /// Resolve code points, then widen to positions (two for each `wide` one)
    fn build(
        chars: Vec<char>,
        classes: Vec<BidiClass>,
        wide: Vec<bool>,
        options: &ParagraphOptions,
    ) -> Self {
        let prologue: Vec<char> = options.prologue.as_deref().unwrap_or_default().chars().collect();
        let epilogue: Vec<char> = options.epilogue.as_deref().unwrap_or_default().chars().collect();
        let context = Context::new(&prologue, &epilogue);

        // positions[i] is where code point i starts; the last entry is the length
        let mut positions = Vec::with_capacity(chars.len() + 1);
        let mut length = 0;
        for &w in &wide {
            positions.push(length);
            length += if w { 2 } else { 1 };
        }
        positions.push(length);

        let ranges = split::split(&chars);
        let last = ranges.len() - 1;

        let mut levels = Vec::with_capacity(length);
        let mut paragraphs = Vec::with_capacity(ranges.len());
        let mut segments = Vec::with_capacity(ranges.len());

        for (index, range) in ranges.into_iter().enumerate() {
            let para_context = match (index == 0, index == last) {
                (true, true) => context,
                (true, false) => context.leading(),
                (false, true) => context.trailing(),
                (false, false) => Context::NONE,
            };

            let resolution = resolve::resolve_classes(
                &chars[range.clone()],
                &classes[range.clone()],
                para_context,
                options.para_level,
            );
            let para_level = resolution.para_level;
            let mut para_levels = resolution.levels;
            line::reset_whitespace(&classes[range.clone()], &mut para_levels, para_level);
            let para_levels = widen(&para_levels, &wide[range.clone()]);

            let start = positions[range.start];
            paragraphs.push(ParagraphInfo {
                index,
                start,
                limit: positions[range.end],
                level: para_level,
                dir: Direction::from_levels(para_levels.iter().copied(), para_level),
            });
            segments.push(runs::logical_runs(para_levels.iter().copied(), start, para_level));
            levels.extend(para_levels);
        }

        let trail: Vec<bool> = wide
            .iter()
            .flat_map(|&w| if w { &[false, true][..] } else { &[false][..] })
            .copied()
            .collect();
        let text = widen(&chars, &wide);
        let classes = widen(&classes, &wide);

        let base_level = paragraphs.first().map_or(Level::LTR, |p| p.level);
        let direction = Direction::from_levels(levels.iter().copied(), base_level);
        let layout = RunLayout::new(segments, &trail);

        tracing::debug!(
            "Resolved {} positions in {} paragraphs, direction {}",
            length,
            paragraphs.len(),
            direction
        );

        Self {
            text: text.into_boxed_slice(),
            classes: classes.into_boxed_slice(),
            levels: levels.into_boxed_slice(),
            trail: trail.into_boxed_slice(),
            paragraphs,
            direction,
            layout,
        }
    }

    /// All paragraphs, in logical order
    pub fn paragraphs(&self) -> &[ParagraphInfo] {
        &self.paragraphs
    }

    pub(crate) fn classes(&self) -> &[BidiClass] {
        &self.classes
    }

    pub(crate) fn resolved_levels(&self) -> &[Level] {
        &self.levels
    }

    /// Positions holding the second unit of a surrogate pair
    pub(crate) fn trail(&self) -> &[bool] {
        &self.trail
    }

    /// Paragraph holding `offset`; the text end belongs to the last one
    pub(crate) fn info_containing(&self, offset: usize) -> ParagraphInfo {
        let idx = self.paragraphs.partition_point(|p| p.limit <= offset);
        self.paragraphs[idx.min(self.paragraphs.len() - 1)]
    }
}

impl BidiView for Paragraph {
    fn text(&self) -> &[char] {
        &self.text
    }

    /// Level of the first paragraph
    fn para_level(&self) -> Level {
        self.paragraphs[0].level
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn len(&self) -> usize {
        self.text.len()
    }

    fn level_at(&self, index: usize) -> Result<Level> {
        self.levels
            .get(index)
            .copied()
            .ok_or_else(|| BidiError::out_of_range("character index", index, self.text.len()))
    }

    fn levels(&self) -> Vec<Level> {
        self.levels.to_vec()
    }

    fn count_paragraphs(&self) -> usize {
        self.paragraphs.len()
    }

    fn paragraph(&self, offset: usize) -> Result<ParagraphInfo> {
        if offset >= self.text.len() {
            return Err(BidiError::out_of_range("character offset", offset, self.text.len()));
        }
        Ok(self.info_containing(offset))
    }

    fn paragraph_by_index(&self, index: usize) -> Result<ParagraphInfo> {
        self.paragraphs
            .get(index)
            .copied()
            .ok_or_else(|| BidiError::out_of_range("paragraph index", index, self.paragraphs.len()))
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
        Line::new(self, start, limit)
    }

    fn write_reordered(&self, options: ReorderOptions) -> String {
        reorder::write_reordered(&self.text, &self.trail, self.layout.visual_runs(), options)
    }
}

/// Repeat each value once more where `wide` is set
fn widen<T: Copy>(values: &[T], wide: &[bool]) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len() + wide.iter().filter(|&&w| w).count());
    for (&value, &w) in values.iter().zip(wide) {
        out.push(value);
        if w {
            out.push(value);
        }
    }
    out
}
