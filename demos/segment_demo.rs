//! Demonstration of the segfeat windowing engine.
//!
//! This example shows how to:
//! 1. Build an engine for a given window length and sample size
//! 2. Feed it a synthetic labeled accelerometer stream
//! 3. Read completed feature vectors as they appear
//! 4. Print them in text and JSON-lines form
//!
//! Run with: cargo run --example segment_demo

use segfeat::{
    output::{format_jsonl, format_text},
    RunStats, SegFeat,
};

/// Samples per window.
const WINDOW_LENGTH: usize = 25;

/// Synthetic activities, each lasting two windows.
const ACTIVITIES: [(&str, f64); 3] = [("sit", 0.05), ("walk", 1.0), ("run", 2.5)];

fn main() {
    println!("segfeat - Segmentation Demo");
    println!("===========================");
    println!();

    let mut engine = match SegFeat::builder()
        .window_length(WINDOW_LENGTH)
        .sample_size(3)
        .build()
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error creating engine: {e}");
            return;
        }
    };
    let stats = RunStats::new();

    println!(
        "Window length: {} samples, {} channels",
        engine.window_length(),
        engine.sample_size()
    );
    println!();

    let mut t = 0.0_f64;
    for (label, amplitude) in ACTIVITIES {
        for _ in 0..2 * WINDOW_LENGTH {
            t += 0.02;
            let sample = [
                amplitude * (t * 6.0).sin(),
                amplitude * (t * 6.0).cos(),
                9.81 + amplitude * 0.3 * (t * 12.0).sin(),
            ];

            if let Err(e) = engine.write(Some(label), &sample) {
                eprintln!("Rejected sample: {e}");
                stats.record_sample_rejected();
                continue;
            }
            stats.record_sample_written();

            if let Some(features) = engine.read() {
                stats.record_window_emitted();
                let window = engine.windows_completed();

                println!("=== Window {window} ===");
                println!("  {}", format_text(&features));
                if let Ok(json) = format_jsonl(window, &features) {
                    println!("  {json}");
                }
                println!();
            }
        }
    }

    println!("{}", stats.summary());
    println!();
    println!("Demo complete!");
}
