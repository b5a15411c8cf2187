//! Example: Reorder bidi text for display
//!
//! Usage: cargo run --example reorder -- "(English עִבְרִית)" [ltr|rtl|default-ltr|default-rtl]
//! Set RUST_LOG=fos_bidi=trace to see resolution events.

use fos_bidi::{BidiView, ParaLevel, Paragraph, ParagraphOptions, ReorderOptions};
use tracing_subscriber::EnvFilter;

fn main() -> fos_bidi::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "(English עִבְרִית)".to_string());
    let para_level: ParaLevel = match args.next() {
        Some(name) => name.parse()?,
        None => ParaLevel::default(),
    };

    let para = Paragraph::new(&text, ParagraphOptions::new().with_para_level(para_level));

    println!("Paragraph level {}, direction {}", para.para_level().number(), para.direction());
    for info in para.paragraphs() {
        println!("  paragraph {}: {}..{} {}", info.index, info.start, info.limit, info.dir);
    }
    for i in 0..para.count_runs() {
        let run = para.visual_run(i)?;
        println!("  run {}: {} at {} (+{})", i, run.dir, run.logical_start, run.length);
    }

    let output = para.write_reordered(ReorderOptions::new().with_mirroring(true));
    println!("{output}");

    Ok(())
}
