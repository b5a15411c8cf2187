//! Logical/visual index mapping

use crate::runs::LevelRun;

/// Bidirectional lookup between logical and visual positions.
///
/// Built once from a visual run list; both directions are O(1) afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMap {
    logical_to_visual: Vec<usize>,
    visual_to_logical: Vec<usize>,
}

impl IndexMap {
    /// Build the maps from runs in visual order.
    ///
    /// `trail` marks positions holding the second unit of a surrogate pair;
    /// it may be shorter than the text, missing entries count as `false`.
    pub fn from_runs(visual_runs: &[LevelRun], trail: &[bool]) -> Self {
        let visual_to_logical = visual_order(visual_runs, trail);
        let mut logical_to_visual = vec![0; visual_to_logical.len()];
        for (visual, &logical) in visual_to_logical.iter().enumerate() {
            logical_to_visual[logical] = visual;
        }
        Self {
            logical_to_visual,
            visual_to_logical,
        }
    }

    pub fn len(&self) -> usize {
        self.visual_to_logical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visual_to_logical.is_empty()
    }

    /// Visual position of a logical position
    pub fn visual_index(&self, logical: usize) -> Option<usize> {
        self.logical_to_visual.get(logical).copied()
    }

    /// Logical position of a visual position
    pub fn logical_index(&self, visual: usize) -> Option<usize> {
        self.visual_to_logical.get(visual).copied()
    }

    /// Visual positions indexed by logical position
    pub fn visual_map(&self) -> &[usize] {
        &self.logical_to_visual
    }

    /// Logical positions indexed by visual position
    pub fn logical_map(&self) -> &[usize] {
        &self.visual_to_logical
    }
}

/// Logical indices in display order; RTL runs are read end to start.
///
/// A surrogate pair inside an RTL run keeps its two units in logical order.
pub fn visual_order(visual_runs: &[LevelRun], trail: &[bool]) -> Vec<usize> {
    let total = visual_runs.iter().map(LevelRun::len).sum();
    let mut indices = Vec::with_capacity(total);
    let is_trail = |pos: usize| trail.get(pos).copied().unwrap_or(false);

    for run in visual_runs {
        if !run.level.is_rtl() {
            indices.extend(run.start..run.limit);
            continue;
        }
        let mut pos = run.limit;
        while pos > run.start {
            pos -= 1;
            if is_trail(pos) && pos > run.start {
                indices.extend([pos - 1, pos]);
                pos -= 1;
            } else {
                indices.push(pos);
            }
        }
    }

    indices
}

/// Invert an index map.
///
/// The result has one slot per value up to the largest one in `map`; slots
/// that nothing maps to are `None`.
pub fn invert_map(map: &[usize]) -> Vec<Option<usize>> {
    let size = map.iter().max().map_or(0, |&max| max + 1);
    let mut inverse = vec![None; size];
    for (src, &dst) in map.iter().enumerate() {
        inverse[dst] = Some(src);
    }
    inverse
}
