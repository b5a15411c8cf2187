//! fOS Bidi - Unicode Bidirectional Algorithm
//!
//! This crate resolves and reorders mixed-direction text (UAX #9):
//! - Paragraph splitting and paragraph level detection
//! - Explicit embeddings, overrides and isolates
//! - Weak, neutral and bracket pair resolution
//! - Line cutting with trailing whitespace handling
//! - Visual runs, index maps and mirrored output
//!
//! ```
//! use fos_bidi::{BidiView, Paragraph, ParagraphOptions, ReorderOptions};
//!
//! let para = Paragraph::new("abc אבג", ParagraphOptions::new());
//! assert_eq!(para.count_runs(), 2);
//! assert_eq!(para.write_reordered(ReorderOptions::new()), "abc גבא");
//! ```

pub mod class;
pub mod context;
pub mod index;
pub mod level;
pub mod line;
pub mod options;
pub mod paragraph;
pub mod reorder;
pub mod resolve;
pub mod runs;
pub mod split;
pub mod tables;
pub mod view;

pub use class::BidiClass;
pub use index::{invert_map, IndexMap};
pub use level::{Direction, Level};
pub use line::Line;
pub use options::{ParaLevel, ParagraphOptions, ReorderOptions, DEFAULT_LTR, DEFAULT_RTL};
pub use paragraph::{Paragraph, ParagraphInfo};
pub use runs::{reorder_logical, reorder_visual, LogicalRun, VisualRun};
pub use view::BidiView;

/// Bidi error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BidiError {
    #[error("Invalid input text: {0}")]
    Input(String),

    #[error("Invalid option: {0}")]
    Validation(String),

    #[error("{what} {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("Invalid line {start}..{limit} for text of length {length}")]
    InvalidLine {
        start: usize,
        limit: usize,
        length: usize,
    },

    #[error("Line {start}..{limit} crosses a paragraph boundary")]
    LineCrossesParagraph { start: usize, limit: usize },
}

impl BidiError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, limit: usize) -> Self {
        BidiError::OutOfRange { what, index, limit }
    }

    /// Index or line bounds errors, as opposed to bad input or options
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            BidiError::OutOfRange { .. }
                | BidiError::InvalidLine { .. }
                | BidiError::LineCrossesParagraph { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BidiError>;
