//! Embedding level resolution for one paragraph
//!
//! Implements the paragraph level rules (P2-P3), explicit levels and
//! directions (X1-X10), weak types (W1-W7), paired brackets and neutrals
//! (N0-N2) and implicit levels (I1-I2). Line-based rules (L1 and later) are
//! applied by the caller, since they depend on where lines break.

use unicode_bidi::{BidiDataSource, HardcodedBidiData};

use crate::class::BidiClass;
use crate::context::Context;
use crate::level::Level;
use crate::options::ParaLevel;

/// Maximum number of open brackets tracked by BD16
const MAX_BRACKET_DEPTH: usize = 63;

/// Result of resolving one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved paragraph embedding level
    pub para_level: Level,
    /// One level per character of the paragraph
    pub levels: Vec<Level>,
}

/// Resolve embedding levels for a single paragraph of text.
///
/// `text` must not contain a paragraph separator except as its last
/// character. The context only biases paragraph level detection and the
/// boundary conditions of the outermost run sequences.
pub fn resolve(text: &[char], context: Context<'_>, requested: ParaLevel) -> Resolution {
    let classes: Vec<BidiClass> = text.iter().map(|&c| BidiClass::of(c)).collect();
    resolve_classes(text, &classes, context, requested)
}

pub(crate) fn resolve_classes(
    text: &[char],
    classes: &[BidiClass],
    context: Context<'_>,
    requested: ParaLevel,
) -> Resolution {
    let para_level = requested
        .explicit()
        .unwrap_or_else(|| detect_para_level(classes, context, requested.fallback()));

    if text.is_empty() {
        return Resolution { para_level, levels: Vec::new() };
    }

    let matching = match_isolates(classes);
    let mut types = classes.to_vec();

    // X1-X8
    let mut levels = resolve_explicit(classes, &mut types, &matching, para_level);

    // X9-X10
    let sequences = isolating_run_sequences(classes, &levels, &matching, para_level, context);
    tracing::trace!(
        "Resolving {} chars in {} isolating run sequences at paragraph level {}",
        text.len(),
        sequences.len(),
        para_level.number()
    );

    for seq in &sequences {
        resolve_weak(seq, &mut types);
        resolve_brackets(seq, text, classes, &mut types);
        resolve_neutral(seq, &mut types);
        resolve_implicit(seq, &types, &mut levels);
    }

    // Removed characters follow their predecessor
    let mut prev = para_level;
    for (level, class) in levels.iter_mut().zip(classes) {
        if class.is_removed_by_x9() {
            *level = prev;
        } else {
            prev = *level;
        }
    }

    Resolution { para_level, levels }
}

/// P2/P3 over prologue, paragraph and epilogue
fn detect_para_level(classes: &[BidiClass], context: Context<'_>, fallback: Level) -> Level {
    let prologue = context.prologue().iter().map(|&c| BidiClass::of(c));
    let epilogue = context.epilogue().iter().map(|&c| BidiClass::of(c));
    first_strong(prologue.chain(classes.iter().copied()).chain(epilogue)).unwrap_or(fallback)
}

/// P2: first strong character, skipping isolated content
fn first_strong<I>(classes: I) -> Option<Level>
where
    I: IntoIterator<Item = BidiClass>,
{
    let mut isolate_count = 0usize;

    for class in classes {
        match class {
            BidiClass::LRI | BidiClass::RLI | BidiClass::FSI => isolate_count += 1,
            BidiClass::PDI => isolate_count = isolate_count.saturating_sub(1),
            BidiClass::L if isolate_count == 0 => return Some(Level::LTR),
            BidiClass::R | BidiClass::AL if isolate_count == 0 => return Some(Level::RTL),
            _ => {}
        }
    }

    None
}

/// BD9: pair each isolate initiator with its matching PDI.
///
/// Entries are set on both ends of a matched pair.
fn match_isolates(classes: &[BidiClass]) -> Vec<Option<usize>> {
    let mut matching = vec![None; classes.len()];
    let mut open = Vec::new();

    for (i, class) in classes.iter().enumerate() {
        match class {
            BidiClass::LRI | BidiClass::RLI | BidiClass::FSI => open.push(i),
            BidiClass::PDI => {
                if let Some(start) = open.pop() {
                    matching[start] = Some(i);
                    matching[i] = Some(start);
                }
            }
            _ => {}
        }
    }

    matching
}

#[derive(Debug, Clone, Copy)]
struct Status {
    level: Level,
    /// Type forced by an override, if any
    override_class: Option<BidiClass>,
}

/// X1-X8: Process explicit embedding/override/isolate characters
fn resolve_explicit(
    classes: &[BidiClass],
    types: &mut [BidiClass],
    matching: &[Option<usize>],
    para_level: Level,
) -> Vec<Level> {
    let mut levels = vec![para_level; classes.len()];
    // Saved outer statuses; the flag marks entries pushed by an isolate
    let mut stack: Vec<(Status, bool)> = Vec::with_capacity(Level::MAX as usize + 2);
    let mut current = Status { level: para_level, override_class: None };
    let mut overflow_isolates = 0usize;
    let mut overflow_embeddings = 0usize;
    let mut valid_isolates = 0usize;

    for (i, &class) in classes.iter().enumerate() {
        match class {
            BidiClass::RLE | BidiClass::LRE | BidiClass::RLO | BidiClass::LRO => {
                let is_rtl = matches!(class, BidiClass::RLE | BidiClass::RLO);
                let new_level = if is_rtl {
                    current.level.next_rtl()
                } else {
                    current.level.next_ltr()
                };
                levels[i] = current.level;

                match new_level {
                    Some(level) if overflow_isolates == 0 && overflow_embeddings == 0 => {
                        stack.push((current, false));
                        current = Status {
                            level,
                            override_class: match class {
                                BidiClass::RLO => Some(BidiClass::R),
                                BidiClass::LRO => Some(BidiClass::L),
                                _ => None,
                            },
                        };
                    }
                    _ => {
                        if overflow_isolates == 0 {
                            overflow_embeddings += 1;
                        }
                    }
                }
            }

            BidiClass::RLI | BidiClass::LRI | BidiClass::FSI => {
                levels[i] = current.level;
                if let Some(forced) = current.override_class {
                    types[i] = forced;
                }

                let is_rtl = match class {
                    BidiClass::RLI => true,
                    BidiClass::LRI => false,
                    _ => fsi_is_rtl(classes, i, matching[i]),
                };
                let new_level = if is_rtl {
                    current.level.next_rtl()
                } else {
                    current.level.next_ltr()
                };

                match new_level {
                    Some(level) if overflow_isolates == 0 && overflow_embeddings == 0 => {
                        valid_isolates += 1;
                        stack.push((current, true));
                        current = Status { level, override_class: None };
                    }
                    _ => overflow_isolates += 1,
                }
            }

            BidiClass::PDI => {
                if overflow_isolates > 0 {
                    overflow_isolates -= 1;
                } else if valid_isolates > 0 {
                    overflow_embeddings = 0;
                    while let Some((outer, isolate)) = stack.pop() {
                        current = outer;
                        if isolate {
                            break;
                        }
                    }
                    valid_isolates -= 1;
                }
                levels[i] = current.level;
                if let Some(forced) = current.override_class {
                    types[i] = forced;
                }
            }

            BidiClass::PDF => {
                if overflow_isolates > 0 {
                    // Inside an overflowed isolate, PDF does nothing
                } else if overflow_embeddings > 0 {
                    overflow_embeddings -= 1;
                } else if let Some(&(outer, false)) = stack.last() {
                    stack.pop();
                    current = outer;
                }
                levels[i] = current.level;
            }

            BidiClass::B => {
                levels[i] = para_level;
            }

            BidiClass::BN => {
                levels[i] = current.level;
            }

            _ => {
                levels[i] = current.level;
                if let Some(forced) = current.override_class {
                    types[i] = forced;
                }
            }
        }
    }

    levels
}

/// X5c: direction of an FSI from the text up to its matching PDI
fn fsi_is_rtl(classes: &[BidiClass], fsi: usize, matching_pdi: Option<usize>) -> bool {
    let end = matching_pdi.unwrap_or(classes.len());
    first_strong(classes[fsi + 1..end].iter().copied()) == Some(Level::RTL)
}

/// An isolating run sequence (BD13)
#[derive(Debug)]
struct RunSequence {
    /// Character indices in logical order, removed characters excluded
    indices: Vec<usize>,
    level: Level,
    sos: BidiClass,
    eos: BidiClass,
}

/// X9-X10: Find level runs and join them into isolating run sequences
fn isolating_run_sequences(
    classes: &[BidiClass],
    levels: &[Level],
    matching: &[Option<usize>],
    para_level: Level,
    context: Context<'_>,
) -> Vec<RunSequence> {
    let len = classes.len();

    // Level runs over the characters X9 keeps
    let mut runs: Vec<Vec<usize>> = Vec::new();
    let mut run_level = None;
    for i in (0..len).filter(|&i| !classes[i].is_removed_by_x9()) {
        if run_level != Some(levels[i]) {
            runs.push(Vec::new());
            run_level = Some(levels[i]);
        }
        if let Some(run) = runs.last_mut() {
            run.push(i);
        }
    }

    let mut run_starting_at = vec![None; len];
    for (idx, run) in runs.iter().enumerate() {
        run_starting_at[run[0]] = Some(idx);
    }

    let first_kept = (0..len).find(|&i| !classes[i].is_removed_by_x9());
    let last_kept = (0..len).rev().find(|&i| !classes[i].is_removed_by_x9());

    let mut consumed = vec![false; runs.len()];
    let mut sequences = Vec::new();

    for start in 0..runs.len() {
        if consumed[start] {
            continue;
        }
        consumed[start] = true;
        let mut indices = runs[start].clone();

        // Follow isolate initiators to the runs holding their matching PDI
        while let Some(&last) = indices.last() {
            if !classes[last].is_isolate_initiator() {
                break;
            }
            let next_run = matching[last].and_then(|pdi| run_starting_at[pdi]);
            match next_run {
                Some(idx) if !consumed[idx] => {
                    consumed[idx] = true;
                    indices.extend_from_slice(&runs[idx]);
                }
                _ => break,
            }
        }

        let first = indices[0];
        let last = indices[indices.len() - 1];
        let level = levels[first];

        let prev = (0..first).rev().find(|&i| !classes[i].is_removed_by_x9());
        let prev_level = prev.map_or(para_level, |i| levels[i]);
        let mut sos = level.max(prev_level).direction_class();
        if prev.is_none() && Some(first) == first_kept && level == para_level {
            if let Some(strong) = context.strong_before() {
                sos = strong;
            }
        }

        let ends_with_initiator = classes[last].is_isolate_initiator();
        let next = if ends_with_initiator {
            None
        } else {
            (last + 1..len).find(|&i| !classes[i].is_removed_by_x9())
        };
        let next_level = next.map_or(para_level, |i| levels[i]);
        let mut eos = level.max(next_level).direction_class();
        if !ends_with_initiator
            && Some(last) == last_kept
            && classes[last] != BidiClass::B
            && level == para_level
        {
            if let Some(strong) = context.strong_after() {
                eos = strong;
            }
        }

        sequences.push(RunSequence { indices, level, sos, eos });
    }

    sequences
}

/// W1-W7: Resolve weak types
fn resolve_weak(seq: &RunSequence, types: &mut [BidiClass]) {
    let indices = &seq.indices;

    // W1: NSM gets type of previous, or ON after an isolate initiator or PDI
    let mut prev_type = seq.sos;
    for &i in indices {
        if types[i] == BidiClass::NSM {
            types[i] = match prev_type {
                BidiClass::LRI | BidiClass::RLI | BidiClass::FSI | BidiClass::PDI => BidiClass::ON,
                other => other,
            };
        }
        prev_type = types[i];
    }

    // W2: EN after AL becomes AN
    let mut last_strong = seq.sos;
    for &i in indices {
        match types[i] {
            BidiClass::L | BidiClass::R | BidiClass::AL => last_strong = types[i],
            BidiClass::EN if last_strong == BidiClass::AL => types[i] = BidiClass::AN,
            _ => {}
        }
    }

    // W3: AL becomes R
    for &i in indices {
        if types[i] == BidiClass::AL {
            types[i] = BidiClass::R;
        }
    }

    // W4: Single ES/CS between numbers
    for k in 1..indices.len().saturating_sub(1) {
        let prev = types[indices[k - 1]];
        let next = types[indices[k + 1]];
        let curr = &mut types[indices[k]];

        match *curr {
            BidiClass::ES | BidiClass::CS if prev == BidiClass::EN && next == BidiClass::EN => {
                *curr = BidiClass::EN;
            }
            BidiClass::CS if prev == BidiClass::AN && next == BidiClass::AN => {
                *curr = BidiClass::AN;
            }
            _ => {}
        }
    }

    // W5: ET adjacent to EN becomes EN
    let mut k = 0;
    while k < indices.len() {
        if types[indices[k]] != BidiClass::ET {
            k += 1;
            continue;
        }
        let start = k;
        while k < indices.len() && types[indices[k]] == BidiClass::ET {
            k += 1;
        }

        let has_en = (start > 0 && types[indices[start - 1]] == BidiClass::EN)
            || (k < indices.len() && types[indices[k]] == BidiClass::EN);

        if has_en {
            for &i in &indices[start..k] {
                types[i] = BidiClass::EN;
            }
        }
    }

    // W6: Remaining separators and terminators become ON
    for &i in indices {
        if matches!(types[i], BidiClass::ES | BidiClass::ET | BidiClass::CS) {
            types[i] = BidiClass::ON;
        }
    }

    // W7: EN after L becomes L
    let mut last_strong = seq.sos;
    for &i in indices {
        match types[i] {
            BidiClass::L | BidiClass::R => last_strong = types[i],
            BidiClass::EN if last_strong == BidiClass::L => types[i] = BidiClass::L,
            _ => {}
        }
    }
}

/// BD16: locate bracket pairs, as positions within the sequence.
///
/// Brackets are matched on their normalized opening bracket, so canonically
/// equivalent brackets such as U+2329 and U+3009 pair up.
fn bracket_pairs(seq: &RunSequence, text: &[char], types: &[BidiClass]) -> Vec<(usize, usize)> {
    // (normalized opening bracket, position of opener)
    let mut stack: Vec<(char, usize)> = Vec::with_capacity(MAX_BRACKET_DEPTH);
    let mut pairs = Vec::new();

    for (k, &i) in seq.indices.iter().enumerate() {
        if types[i] != BidiClass::ON {
            continue;
        }
        let Some(bracket) = HardcodedBidiData.bidi_matched_opening_bracket(text[i]) else {
            continue;
        };

        if bracket.is_open {
            if stack.len() == MAX_BRACKET_DEPTH {
                break;
            }
            stack.push((bracket.opening, k));
        } else if let Some(pos) = stack.iter().rposition(|&(open, _)| open == bracket.opening) {
            pairs.push((stack[pos].1, k));
            stack.truncate(pos);
        }
    }

    pairs.sort_unstable();
    pairs
}

/// N0: Resolve paired brackets
fn resolve_brackets(seq: &RunSequence, text: &[char], classes: &[BidiClass], types: &mut [BidiClass]) {
    let indices = &seq.indices;
    let embedding = seq.level.direction_class();
    let opposite = if embedding == BidiClass::L { BidiClass::R } else { BidiClass::L };

    for (open, close) in bracket_pairs(seq, text, types) {
        let mut found_embedding = false;
        let mut found_opposite = false;
        for &i in &indices[open + 1..close] {
            match types[i].strong_direction() {
                Some(dir) if dir == embedding => {
                    found_embedding = true;
                    break;
                }
                Some(_) => found_opposite = true,
                None => {}
            }
        }

        let resolved = if found_embedding {
            embedding
        } else if found_opposite {
            let preceding = indices[..open]
                .iter()
                .rev()
                .find_map(|&i| types[i].strong_direction())
                .unwrap_or(seq.sos);
            if preceding == opposite { opposite } else { embedding }
        } else {
            // N0d: no strong type inside, leave for N1/N2
            continue;
        };

        for k in [open, close] {
            types[indices[k]] = resolved;
            for &i in &indices[k + 1..] {
                if classes[i] != BidiClass::NSM {
                    break;
                }
                types[i] = resolved;
            }
        }
    }
}

/// N1-N2: Resolve neutral and isolate types
fn resolve_neutral(seq: &RunSequence, types: &mut [BidiClass]) {
    let indices = &seq.indices;
    let embedding = seq.level.direction_class();

    let mut k = 0;
    while k < indices.len() {
        if !types[indices[k]].is_neutral_or_isolate() {
            k += 1;
            continue;
        }
        let start = k;
        while k < indices.len() && types[indices[k]].is_neutral_or_isolate() {
            k += 1;
        }

        let before = if start == 0 {
            seq.sos
        } else {
            types[indices[start - 1]].strong_direction().unwrap_or(embedding)
        };
        let after = if k == indices.len() {
            seq.eos
        } else {
            types[indices[k]].strong_direction().unwrap_or(embedding)
        };

        let resolved = if before == after { before } else { embedding };
        for &i in &indices[start..k] {
            types[i] = resolved;
        }
    }
}

/// I1-I2: Resolve implicit levels
fn resolve_implicit(seq: &RunSequence, types: &[BidiClass], levels: &mut [Level]) {
    for &i in &seq.indices {
        let level = levels[i];
        levels[i] = if level.is_ltr() {
            match types[i] {
                BidiClass::R => level.raise(1),
                BidiClass::AN | BidiClass::EN => level.raise(2),
                _ => level,
            }
        } else {
            match types[i] {
                BidiClass::L | BidiClass::EN | BidiClass::AN => level.raise(1),
                _ => level,
            }
        };
    }
}
