//! Directional runs and visual reordering (rule L2)

use serde::Serialize;

use crate::index::{self, IndexMap};
use crate::level::{Direction, Level};
use crate::{BidiError, Result};

/// Maximal span of characters sharing one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRun {
    /// Start index (inclusive)
    pub start: usize,
    /// End index (exclusive)
    pub limit: usize,
    pub level: Level,
}

impl LevelRun {
    pub fn len(&self) -> usize {
        self.limit - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.limit
    }

    pub fn direction(&self) -> Direction {
        Direction::of_level(self.level)
    }
}

/// A run in visual order, as reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualRun {
    pub dir: Direction,
    pub logical_start: usize,
    pub length: usize,
}

impl From<&LevelRun> for VisualRun {
    fn from(run: &LevelRun) -> Self {
        Self {
            dir: run.direction(),
            logical_start: run.start,
            length: run.len(),
        }
    }
}

/// The logical run containing a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalRun {
    pub logical_limit: usize,
    pub level: u8,
    pub dir: Direction,
}

impl From<&LevelRun> for LogicalRun {
    fn from(run: &LevelRun) -> Self {
        Self {
            logical_limit: run.limit,
            level: run.level.number(),
            dir: run.direction(),
        }
    }
}

/// Group levels into logical runs.
///
/// Positions start at `offset`. An empty level sequence yields a single
/// zero-length run at `para_level`.
pub fn logical_runs<I>(levels: I, offset: usize, para_level: Level) -> Vec<LevelRun>
where
    I: IntoIterator<Item = Level>,
{
    let mut runs: Vec<LevelRun> = Vec::new();

    for (i, level) in levels.into_iter().enumerate() {
        let pos = offset + i;
        match runs.last_mut() {
            Some(run) if run.level == level => run.limit = pos + 1,
            _ => runs.push(LevelRun { start: pos, limit: pos + 1, level }),
        }
    }

    if runs.is_empty() {
        runs.push(LevelRun { start: offset, limit: offset, level: para_level });
    }

    runs
}

/// Reorder logical runs for visual display (L2).
///
/// From the highest level down to the lowest odd level, every maximal
/// sequence of runs at that level or higher is reversed.
pub fn visual_runs(logical: &[LevelRun]) -> Vec<LevelRun> {
    let mut runs = logical.to_vec();

    let Some(max_level) = runs.iter().map(|r| r.level.number()).max() else {
        return runs;
    };
    let Some(min_odd) = runs.iter().map(|r| r.level.number()).filter(|l| l % 2 == 1).min() else {
        return runs;
    };

    for level in (min_odd..=max_level).rev() {
        let mut i = 0;
        while i < runs.len() {
            if runs[i].level.number() < level {
                i += 1;
                continue;
            }
            let start = i;
            while i < runs.len() && runs[i].level.number() >= level {
                i += 1;
            }
            runs[start..i].reverse();
        }
    }

    runs
}

/// Visual-to-logical map for a line given its levels (`ubidi_reorderVisual`)
pub fn reorder_visual(levels: &[Level]) -> Vec<usize> {
    let runs = logical_runs(levels.iter().copied(), 0, Level::LTR);
    index::visual_order(&visual_runs(&runs), &[])
}

/// Logical-to-visual map for a line given its levels (`ubidi_reorderLogical`)
pub fn reorder_logical(levels: &[Level]) -> Vec<usize> {
    let runs = logical_runs(levels.iter().copied(), 0, Level::LTR);
    IndexMap::from_runs(&visual_runs(&runs), &[]).visual_map().to_vec()
}

/// Runs and index maps of a paragraph or line
#[derive(Debug, Clone)]
pub(crate) struct RunLayout {
    logical: Vec<LevelRun>,
    visual: Vec<LevelRun>,
    index: IndexMap,
}

impl RunLayout {
    /// Lay out runs for consecutive segments that are reordered independently.
    ///
    /// `trail` marks the second unit of each surrogate pair.
    pub(crate) fn new(segments: Vec<Vec<LevelRun>>, trail: &[bool]) -> Self {
        let mut logical = Vec::new();
        let mut visual = Vec::new();
        for segment in segments {
            visual.extend(visual_runs(&segment));
            logical.extend(segment);
        }
        let index = IndexMap::from_runs(&visual, trail);
        Self { logical, visual, index }
    }

    /// Runs in visual order
    pub(crate) fn visual_runs(&self) -> &[LevelRun] {
        &self.visual
    }

    pub(crate) fn count_runs(&self) -> usize {
        self.visual.len()
    }

    pub(crate) fn visual_run(&self, index: usize) -> Result<VisualRun> {
        self.visual
            .get(index)
            .map(VisualRun::from)
            .ok_or_else(|| BidiError::out_of_range("run index", index, self.visual.len()))
    }

    pub(crate) fn logical_run(&self, offset: usize) -> Result<LogicalRun> {
        if offset >= self.index.len() {
            return Err(BidiError::out_of_range("character offset", offset, self.index.len()));
        }
        let idx = self.logical.partition_point(|run| run.limit <= offset);
        Ok(LogicalRun::from(&self.logical[idx]))
    }

    pub(crate) fn visual_index(&self, logical: usize) -> Result<usize> {
        self.index
            .visual_index(logical)
            .ok_or_else(|| BidiError::out_of_range("logical index", logical, self.index.len()))
    }

    pub(crate) fn logical_index(&self, visual: usize) -> Result<usize> {
        self.index
            .logical_index(visual)
            .ok_or_else(|| BidiError::out_of_range("visual index", visual, self.index.len()))
    }

    pub(crate) fn index(&self) -> &IndexMap {
        &self.index
    }
}
