//! Example of summarizing and splitting a batch of activities.
//!
//! Run with: cargo run --example batch_splits

use telemetry_splits::{process_telemetry, SplitConfig, TelemetrySample};
use std::time::Instant;

fn main() {
    println!("Kilometer Splits Example\n");

    let mut rows = Vec::new();

    // Zurich lakeside: ~3.4 km at ~4:50/km, one sample per second
    rows.extend(synthetic_run(101, 47.3667, 8.5500, 1000, 3.45));

    // Short jog with no heart-rate strap
    rows.extend(
        synthetic_run(102, 46.5197, 6.6323, 400, 2.8)
            .into_iter()
            .map(|mut s| {
                s.hr_bpm = None;
                s
            }),
    );

    // A recording whose GPS dropped out mid-way
    let mut dropout = synthetic_run(103, 45.4642, 9.1900, 120, 3.0);
    dropout[60].lat = None;
    dropout[60].lon = None;
    rows.extend(dropout);

    let config = SplitConfig::default();

    let start = Instant::now();
    let output = match process_telemetry(&rows, &config) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("Processing failed: {}", err);
            return;
        }
    };
    let elapsed = start.elapsed();

    println!("Processed {} samples in {:?}\n", rows.len(), elapsed);

    println!("Summaries:");
    for summary in &output.summaries {
        println!(
            "  {}: hr {} (max {}), cadence {}, ascent {}, stride {}",
            summary.activity_id,
            fmt(summary.hr_avg, 0),
            fmt(summary.hr_max, 0),
            fmt(summary.cad_avg, 1),
            fmt(summary.total_ascent, 1),
            fmt(summary.stride_len_m, 2),
        );
    }

    println!("\nSplits:");
    for segment in &output.segments {
        println!(
            "  {} km {}: {:.0}m, {} s/km, avg hr {}",
            segment.activity_id,
            segment.segment_number,
            segment.segment_distance_m,
            fmt(segment.pace_sec_per_km, 0),
            fmt(segment.avg_hr_bpm, 0),
        );
    }

    println!("\nIssues:");
    for issue in &output.issues {
        println!("  {}", issue);
    }
}

/// Generate a straight northbound run at `speed` m/s with gently rolling terrain.
fn synthetic_run(id: i64, lat: f64, lon: f64, seconds: usize, speed: f64) -> Vec<TelemetrySample> {
    // ~111,195 m per degree of latitude
    let deg_per_second = speed / 111_195.0;
    (0..seconds)
        .map(|i| {
            let t = i as f64;
            TelemetrySample::new(id, t, lat + t * deg_per_second, lon)
                .with_distance(t * speed)
                .with_altitude(420.0 + (t / 90.0).sin() * 6.0)
                .with_heart_rate(138.0 + (t / 60.0).min(20.0))
                .with_cadence(86.0)
                .with_watts(250.0)
        })
        .collect()
}

fn fmt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}
