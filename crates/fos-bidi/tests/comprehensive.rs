//! Comprehensive tests for fos-bidi
//!
//! Paragraph resolution, runs, index maps, lines and reordering on the
//! reference texts used by host bindings.

use fos_bidi::*;
use serde_json::json;

const FOX: &str = "The quick brown fox jumped";
const HEBREW: &str = "עִבְרִית";
const MIXED: &str = "(English עִבְרִית)";
const TWO_PARAGRAPHS: &str = "English\nעִבְרִית";

fn para(text: &str) -> Paragraph {
    Paragraph::new(text, ParagraphOptions::new())
}

fn para_with(text: &str, para_level: ParaLevel) -> Paragraph {
    Paragraph::new(text, ParagraphOptions::new().with_para_level(para_level))
}

fn runs<V: BidiView + ?Sized>(view: &V) -> Vec<(Direction, usize, usize)> {
    (0..view.count_runs())
        .map(|i| {
            let run = view.visual_run(i).unwrap();
            (run.dir, run.logical_start, run.length)
        })
        .collect()
}

fn check_runs_partition<V: BidiView + ?Sized>(view: &V) {
    let mut spans: Vec<(usize, usize)> = runs(view).iter().map(|&(_, s, l)| (s, l)).collect();
    spans.sort();
    let mut next = 0;
    for (start, length) in spans {
        assert_eq!(start, next, "runs leave a gap or overlap");
        next = start + length;
    }
    assert_eq!(next, view.len());
}

fn check_bijection<V: BidiView + ?Sized>(view: &V) {
    for i in 0..view.len() {
        assert_eq!(view.logical_index(view.visual_index(i).unwrap()).unwrap(), i);
        assert_eq!(view.visual_index(view.logical_index(i).unwrap()).unwrap(), i);
    }
}

const SAMPLES: &[&str] = &[
    FOX,
    HEBREW,
    MIXED,
    TWO_PARAGRAPHS,
    "",
    " ",
    "abc 123 אבג 456 def",
    "שלום (world) ١٢٣ test!",
    "a\u{202B}b\u{202A}c\u{202C}d\u{202C}e",
    "x\u{2067}אב\u{2066}cd\u{2069}ef\u{2069}y",
    "first\r\nשני\u{2029}third (רביעי)\n",
];

// ============================================================================
// UNIDIRECTIONAL TEXT
// ============================================================================

#[test]
fn test_ltr_text() {
    let p = para(FOX);
    assert_eq!(p.len(), 26);
    assert_eq!(p.para_level(), Level::LTR);
    assert_eq!(p.direction(), Direction::Ltr);
    assert_eq!(p.count_runs(), 1);
    assert_eq!(runs(&p), vec![(Direction::Ltr, 0, 26)]);
}

#[test]
fn test_rtl_text_default_rtl() {
    let p = para_with(HEBREW, ParaLevel::DefaultRtl);
    assert_eq!(p.len(), 8);
    assert_eq!(p.para_level(), Level::RTL);
    assert_eq!(p.direction(), Direction::Rtl);
    assert_eq!(p.visual_index(0).unwrap(), 7);
    assert_eq!(p.logical_index(0).unwrap(), 7);
}

#[test]
fn test_rtl_text_detected_with_default_ltr() {
    let p = para(HEBREW);
    assert_eq!(p.para_level(), Level::RTL);
    assert_eq!(p.direction(), Direction::Rtl);
}

#[test]
fn test_neutral_text_fallback() {
    let p = para(" ");
    assert_eq!(p.para_level(), Level::LTR);
    assert_eq!(p.direction(), Direction::Ltr);

    let p = para_with(" ", ParaLevel::DefaultRtl);
    assert_eq!(p.para_level(), Level::RTL);
    assert_eq!(p.direction(), Direction::Rtl);
    assert_eq!(p.level_at(0).unwrap(), Level::RTL);
}

#[test]
fn test_default_rtl_with_leading_ltr() {
    let p = para_with("abc אבג", ParaLevel::DefaultRtl);
    assert_eq!(p.para_level(), Level::LTR);
    assert_eq!(p.direction(), Direction::Mixed);
}

// ============================================================================
// MIXED TEXT AND LINES
// ============================================================================

#[test]
fn test_mixed_runs() {
    let p = para_with(MIXED, ParaLevel::Ltr);
    assert_eq!(p.len(), 18);
    assert_eq!(p.direction(), Direction::Mixed);
    assert_eq!(
        runs(&p),
        vec![(Direction::Ltr, 0, 9), (Direction::Rtl, 9, 8), (Direction::Ltr, 17, 1)]
    );
}

#[test]
fn test_mixed_logical_runs() {
    let p = para_with(MIXED, ParaLevel::Ltr);
    let run = p.logical_run(3).unwrap();
    assert_eq!((run.logical_limit, run.level, run.dir), (9, 0, Direction::Ltr));
    let run = p.logical_run(12).unwrap();
    assert_eq!((run.logical_limit, run.level, run.dir), (17, 1, Direction::Rtl));
    let run = p.logical_run(17).unwrap();
    assert_eq!(run.logical_limit, 18);
}

#[test]
fn test_line_splits_runs() {
    let p = para_with(MIXED, ParaLevel::Ltr);
    let line = p.set_line(9, 18).unwrap();
    assert_eq!(line.len(), 9);
    assert_eq!(line.count_runs(), 2);
    assert_eq!(runs(&line), vec![(Direction::Rtl, 0, 8), (Direction::Ltr, 8, 1)]);
    assert_eq!(line.visual_index(0).unwrap(), 7);
    assert_eq!(line.visual_index(8).unwrap(), 8);

    // The parent is untouched
    assert_eq!(p.count_runs(), 3);
}

#[test]
fn test_line_paragraph_queries() {
    let p = para(TWO_PARAGRAPHS);
    let line = p.set_line(8, 16).unwrap();
    assert_eq!(line.para_level(), Level::RTL);
    assert_eq!(line.direction(), Direction::Rtl);
    assert_eq!(line.count_paragraphs(), 1);
    assert_eq!(
        line.paragraph(3).unwrap(),
        ParagraphInfo { index: 0, start: 0, limit: 8, level: Level::RTL, dir: Direction::Rtl }
    );
    assert_eq!(line.paragraph_index(), 1);
    assert_eq!(line.visual_index(0).unwrap(), 7);
}

// ============================================================================
// PARAGRAPHS
// ============================================================================

#[test]
fn test_two_paragraphs() {
    let p = para(TWO_PARAGRAPHS);
    assert_eq!(p.len(), 16);
    assert_eq!(p.count_paragraphs(), 2);

    let first = ParagraphInfo { index: 0, start: 0, limit: 8, level: Level::LTR, dir: Direction::Ltr };
    let second = ParagraphInfo { index: 1, start: 8, limit: 16, level: Level::RTL, dir: Direction::Rtl };
    assert_eq!(p.paragraph_by_index(0).unwrap(), first);
    assert_eq!(p.paragraph_by_index(1).unwrap(), second);

    for offset in 0..8 {
        assert_eq!(p.paragraph(offset).unwrap(), first);
    }
    for offset in 8..16 {
        assert_eq!(p.paragraph(offset).unwrap(), second);
    }
}

#[test]
fn test_paragraphs_keep_logical_order() {
    let p = para(TWO_PARAGRAPHS);
    assert_eq!(p.visual_index(0).unwrap(), 0);
    assert_eq!(p.visual_index(8).unwrap(), 15);
    assert_eq!(p.visual_index(15).unwrap(), 8);
}

// ============================================================================
// REORDERING
// ============================================================================

#[test]
fn test_mirroring_rtl_brackets() {
    let p = para_with("אבג (דה) ef", ParaLevel::Ltr);
    let mirrored = p.write_reordered(ReorderOptions::new().with_mirroring(true));
    assert_eq!(mirrored, "(הד) גבא ef");
}

#[test]
fn test_mirroring_leaves_ltr_brackets() {
    let p = para_with("a (בג) d", ParaLevel::Ltr);
    let mirrored = p.write_reordered(ReorderOptions::new().with_mirroring(true));
    assert_eq!(mirrored, "a (גב) d");
}

#[test]
fn test_reordered_length_matches() {
    for text in SAMPLES {
        let p = para(text);
        let out = p.write_reordered(ReorderOptions::new());
        assert_eq!(out.chars().count(), p.result_length());
        assert_eq!(p.processed_length(), p.len());
    }
}

#[test]
fn test_reorder_static_helpers() {
    let levels: Vec<Level> = [0, 0, 1, 1, 2, 1].iter().map(|&l| Level::new(l).unwrap()).collect();
    let visual = reorder_visual(&levels);
    let logical = reorder_logical(&levels);
    assert_eq!(visual, vec![0, 1, 5, 4, 3, 2]);
    let inverse: Vec<usize> = invert_map(&visual).into_iter().flatten().collect();
    assert_eq!(inverse, logical);
}

// ============================================================================
// CONTEXT
// ============================================================================

#[test]
fn test_prologue_changes_direction() {
    let plain = para(" ");
    assert_eq!(plain.direction(), Direction::Ltr);

    let options = ParagraphOptions::new().with_prologue("שלום");
    let p = Paragraph::new(" ", options);
    assert_eq!(p.direction(), Direction::Rtl);
    assert_eq!(p.len(), 1);
    assert_eq!(p.write_reordered(ReorderOptions::new()), " ");
}

#[test]
fn test_prologue_before_separator_ignored() {
    let options = ParagraphOptions::new().with_prologue("שלום\nabc");
    let p = Paragraph::new(" ", options);
    assert_eq!(p.direction(), Direction::Ltr);
}

#[test]
fn test_epilogue_resolves_trailing_neutral() {
    let p = Paragraph::new("a א!", ParagraphOptions::new().with_para_level(ParaLevel::Ltr));
    assert_eq!(p.level_at(3).unwrap(), Level::LTR);

    let options = ParagraphOptions::new()
        .with_para_level(ParaLevel::Ltr)
        .with_epilogue("ב");
    let p = Paragraph::new("a א!", options);
    assert_eq!(p.level_at(3).unwrap(), Level::RTL);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_runs_partition_text() {
    for text in SAMPLES {
        for level in [ParaLevel::DefaultLtr, ParaLevel::DefaultRtl, ParaLevel::Ltr, ParaLevel::Rtl] {
            check_runs_partition(&para_with(text, level));
        }
    }
}

#[test]
fn test_index_bijection() {
    for text in SAMPLES {
        for level in [ParaLevel::DefaultLtr, ParaLevel::DefaultRtl, ParaLevel::Ltr, ParaLevel::Rtl] {
            check_bijection(&para_with(text, level));
        }
    }
}

#[test]
fn test_lines_satisfy_properties() {
    for text in SAMPLES {
        let p = para(text);
        for info in p.paragraphs() {
            for start in info.start..=info.limit {
                for limit in start..=info.limit {
                    let line = p.set_line(start, limit).unwrap();
                    check_runs_partition(&line);
                    check_bijection(&line);
                }
            }
        }
    }
}

#[test]
fn test_maps_are_inverse() {
    for text in SAMPLES {
        let p = para(text);
        let visual_map = p.visual_map();
        let logical_map = p.logical_map();
        assert_eq!(visual_map.len(), p.len());
        for (logical, &visual) in visual_map.iter().enumerate() {
            assert_eq!(logical_map[visual], logical);
        }
    }
}

#[test]
fn test_levels_match_level_at() {
    for text in SAMPLES {
        let p = para(text);
        let levels = p.levels();
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(p.level_at(i).unwrap(), *level);
        }
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_record_shapes() {
    let p = para(FOX);
    assert_eq!(
        serde_json::to_value(p.visual_run(0).unwrap()).unwrap(),
        json!({"dir": "ltr", "logicalStart": 0, "length": 26})
    );
    assert_eq!(
        serde_json::to_value(p.logical_run(0).unwrap()).unwrap(),
        json!({"logicalLimit": 26, "level": 0, "dir": "ltr"})
    );

    let p = para(TWO_PARAGRAPHS);
    assert_eq!(
        serde_json::to_value(p.paragraph_by_index(1).unwrap()).unwrap(),
        json!({"index": 1, "start": 8, "limit": 16, "level": 1, "dir": "rtl"})
    );
    assert_eq!(serde_json::to_value(p.direction()).unwrap(), json!("mixed"));
}

#[test]
fn test_options_from_json() {
    let options = ParagraphOptions::from_json(r#"{"paraLevel": 255, "prologue": "שלום"}"#).unwrap();
    assert_eq!(options.para_level, ParaLevel::DefaultRtl);
    assert_eq!(options.prologue.as_deref(), Some("שלום"));

    let options = ReorderOptions::from_json(r#"{"mirroring": true}"#).unwrap();
    assert!(options.mirroring);
    assert!(!options.output_reverse);
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Paragraph>();
    assert_send_sync::<Line<'static>>();
}

#[test]
fn test_lines_across_threads() {
    let p = para_with(MIXED, ParaLevel::Ltr);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let p = &p;
                scope.spawn(move || p.set_line(i, 18).unwrap().count_runs())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap() >= 2);
        }
    });
}

#[test]
fn test_dyn_view() {
    let p = para_with(MIXED, ParaLevel::Ltr);
    let line = p.set_line(0, 9).unwrap();
    let views: Vec<&dyn BidiView> = vec![&p, &line];
    assert_eq!(views[0].len(), 18);
    assert_eq!(views[1].count_runs(), 1);
}
