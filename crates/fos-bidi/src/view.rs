//! Queries shared by paragraphs and lines

use crate::level::{Direction, Level};
use crate::line::Line;
use crate::options::ReorderOptions;
use crate::paragraph::ParagraphInfo;
use crate::runs::{LogicalRun, VisualRun};
use crate::Result;

/// Read access to resolved bidi text.
///
/// Implemented by [`Paragraph`](crate::Paragraph) and [`Line`]. Indices are
/// relative to the view: a line's index 0 is its first character.
pub trait BidiView {
    /// One character per position, in logical order.
    ///
    /// For UTF-16 input both units of a surrogate pair hold the decoded
    /// character.
    fn text(&self) -> &[char];

    /// Embedding level of the (first) paragraph
    fn para_level(&self) -> Level;

    /// `Ltr` or `Rtl` when all levels agree, `Mixed` otherwise
    fn direction(&self) -> Direction;

    fn len(&self) -> usize {
        self.text().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of positions examined by the algorithm
    fn processed_length(&self) -> usize {
        self.len()
    }

    /// Number of positions written by reordering without control removal
    fn result_length(&self) -> usize {
        self.len()
    }

    fn level_at(&self, index: usize) -> Result<Level>;

    /// Resolved level of every character
    fn levels(&self) -> Vec<Level>;

    fn count_paragraphs(&self) -> usize;

    /// Paragraph containing a character
    fn paragraph(&self, offset: usize) -> Result<ParagraphInfo>;

    fn paragraph_by_index(&self, index: usize) -> Result<ParagraphInfo>;

    /// Number of directional runs
    fn count_runs(&self) -> usize;

    /// Run at a visual position
    fn visual_run(&self, index: usize) -> Result<VisualRun>;

    /// Logical run containing a character
    fn logical_run(&self, offset: usize) -> Result<LogicalRun>;

    fn logical_index(&self, visual: usize) -> Result<usize>;

    fn visual_index(&self, logical: usize) -> Result<usize>;

    /// Visual position of every logical position
    fn visual_map(&self) -> &[usize];

    /// Logical position of every visual position
    fn logical_map(&self) -> &[usize];

    /// Cut a line `start..limit` out of this view
    fn set_line(&self, start: usize, limit: usize) -> Result<Line<'_>>;

    /// Text in visual order
    fn write_reordered(&self, options: ReorderOptions) -> String;
}
