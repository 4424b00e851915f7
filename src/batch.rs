//! Whole-table processing.
//!
//! Groups a telemetry table by activity, then runs the summary aggregator and
//! the segmentation engine on every activity. Activities share no state, so
//! with the `parallel` feature they are fanned out over the rayon pool and the
//! results merged back in `activity_id` order.
//!
//! A data problem in one activity never aborts the run. The activity keeps its
//! summary, is left out of the segment table, and its error is returned in
//! [`SplitOutput::issues`].

use log::{debug, info, warn};

use crate::error::{Result, SplitError};
use crate::grouping::group_by_activity;
use crate::splits::{segment_unchecked, SegmentRecord};
use crate::summary::{summarize_activity, ActivitySummary};
use crate::{ActivityTelemetry, SplitConfig, TelemetrySample};

/// The two derived tables plus per-activity issues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitOutput {
    /// One record per activity, ordered by `activity_id`
    pub summaries: Vec<ActivitySummary>,
    /// Segments ordered by `activity_id`, then `segment_number`
    pub segments: Vec<SegmentRecord>,
    /// Activities excluded from the segment table, ordered by `activity_id`
    pub issues: Vec<SplitError>,
}

struct ActivityOutcome {
    summary: ActivitySummary,
    segments: Result<Vec<SegmentRecord>>,
}

/// Process a telemetry table sequentially.
///
/// Returns an error only for an invalid configuration; data errors are
/// reported per activity in [`SplitOutput::issues`].
///
/// # Example
/// ```
/// use telemetry_splits::{process_telemetry, SplitConfig, SplitError, TelemetrySample};
///
/// let mut no_position = TelemetrySample::new(2, 1.0, 0.0, 0.0);
/// no_position.lat = None;
///
/// let rows = vec![
///     TelemetrySample::new(1, 0.0, 0.0, 0.0),
///     TelemetrySample::new(1, 60.0, 0.0, 0.002),
///     TelemetrySample::new(2, 0.0, 0.0, 0.0),
///     no_position,
/// ];
///
/// let output = process_telemetry(&rows, &SplitConfig::default()).unwrap();
/// assert_eq!(output.summaries.len(), 2);
/// assert!(output.segments.iter().all(|s| s.activity_id == 1));
/// assert!(matches!(output.issues[0], SplitError::MissingPosition { activity_id: 2, .. }));
/// ```
pub fn process_telemetry(samples: &[TelemetrySample], config: &SplitConfig) -> Result<SplitOutput> {
    config.validate()?;
    let activities = group_by_activity(samples);
    Ok(run_sequential(&activities, config))
}

/// Process already-grouped activities sequentially.
///
/// An empty activity still gets a summary and one degenerate segment.
pub fn process_activities(
    activities: &[ActivityTelemetry],
    config: &SplitConfig,
) -> Result<SplitOutput> {
    config.validate()?;
    Ok(run_sequential(activities, config))
}

fn run_sequential(activities: &[ActivityTelemetry], config: &SplitConfig) -> SplitOutput {
    let start = std::time::Instant::now();

    let outcomes: Vec<ActivityOutcome> = activities
        .iter()
        .map(|activity| process_activity(activity, config))
        .collect();

    let output = merge_outcomes(outcomes);
    info!(
        "[TelemetrySplits] Processed {} activities: {} segments, {} issues in {:?}",
        activities.len(),
        output.segments.len(),
        output.issues.len(),
        start.elapsed()
    );
    output
}

/// Process a telemetry table using parallel processing.
///
/// Same output as [`process_telemetry`], with one rayon task per activity.
/// Recommended for large tables (many activities).
#[cfg(feature = "parallel")]
pub fn process_telemetry_parallel(
    samples: &[TelemetrySample],
    config: &SplitConfig,
) -> Result<SplitOutput> {
    use rayon::prelude::*;

    config.validate()?;
    let start = std::time::Instant::now();
    let activities = group_by_activity(samples);

    let outcomes: Vec<ActivityOutcome> = activities
        .par_iter()
        .map(|activity| process_activity(activity, config))
        .collect();

    let output = merge_outcomes(outcomes);
    info!(
        "[TelemetrySplits] Processed {} activities in parallel: {} segments, {} issues in {:?}",
        activities.len(),
        output.segments.len(),
        output.issues.len(),
        start.elapsed()
    );
    Ok(output)
}

/// Expects `config` to be validated by the caller.
fn process_activity(activity: &ActivityTelemetry, config: &SplitConfig) -> ActivityOutcome {
    debug!(
        "[TelemetrySplits] activity {}: {} samples",
        activity.activity_id,
        activity.samples.len()
    );
    ActivityOutcome {
        summary: summarize_activity(activity, config),
        segments: segment_unchecked(activity, config),
    }
}

/// Merge per-activity outcomes into deterministic, `activity_id`-ordered tables.
fn merge_outcomes(outcomes: Vec<ActivityOutcome>) -> SplitOutput {
    let mut output = SplitOutput::default();

    for outcome in outcomes {
        let activity_id = outcome.summary.activity_id;
        output.summaries.push(outcome.summary);
        match outcome.segments {
            Ok(segments) => output.segments.extend(segments),
            Err(err) => {
                warn!("[TelemetrySplits] Skipping segmentation of activity {}: {}", activity_id, err);
                output.issues.push(err);
            }
        }
    }

    // Stable sorts keep segment order within an activity
    output.summaries.sort_by_key(|s| s.activity_id);
    output
        .segments
        .sort_by_key(|s| (s.activity_id, s.segment_number));
    output.issues.sort_by_key(|e| e.activity_id());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(id: i64, count: usize) -> Vec<TelemetrySample> {
        (0..count)
            .map(|i| {
                TelemetrySample::new(id, i as f64 * 20.0, 0.0, i as f64 * 0.001)
                    .with_heart_rate(150.0)
                    .with_distance(i as f64 * 111.0)
            })
            .collect()
    }

    #[test]
    fn test_empty_table() {
        let output = process_telemetry(&[], &SplitConfig::default()).unwrap();
        assert_eq!(output, SplitOutput::default());
    }

    #[test]
    fn test_invalid_config_aborts() {
        let config = SplitConfig {
            segment_length_m: 0.0,
            ..SplitConfig::default()
        };
        assert!(matches!(
            process_telemetry(&run(1, 3), &config),
            Err(SplitError::InvalidSegmentLength(_))
        ));
    }

    #[test]
    fn test_grouped_entry_point_validates_once_up_front() {
        let config = SplitConfig {
            segment_length_m: f64::NAN,
            ..SplitConfig::default()
        };
        let activities = vec![ActivityTelemetry::new(1, run(1, 3))];
        assert!(matches!(
            process_activities(&activities, &config),
            Err(SplitError::InvalidSegmentLength(_))
        ));

        let output = process_activities(&activities, &SplitConfig::default()).unwrap();
        assert_eq!(output.summaries.len(), 1);
        assert!(output.issues.is_empty());
    }

    #[test]
    fn test_empty_activity_gets_degenerate_segment() {
        let activities = vec![
            ActivityTelemetry::new(4, vec![]),
            ActivityTelemetry::new(3, run(3, 2)),
        ];
        let output = process_activities(&activities, &SplitConfig::default()).unwrap();

        assert_eq!(output.summaries.len(), 2);
        assert!(output.issues.is_empty());
        let empty: Vec<_> = output
            .segments
            .iter()
            .filter(|s| s.activity_id == 4)
            .collect();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].segment_number, 1);
        assert_eq!(empty[0].start_lat, None);
        assert_eq!(empty[0].pace_sec_per_km, None);
        assert_eq!(empty[0].sample_count, 0);
    }

    #[test]
    fn test_output_ordered_by_activity() {
        let mut rows = run(30, 12);
        rows.extend(run(10, 25));
        rows.extend(run(20, 5));

        let output = process_telemetry(&rows, &SplitConfig::default()).unwrap();
        let ids: Vec<i64> = output.summaries.iter().map(|s| s.activity_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);

        let keys: Vec<(i64, u32)> = output
            .segments
            .iter()
            .map(|s| (s.activity_id, s.segment_number))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(output.issues.is_empty());
    }

    #[test]
    fn test_bad_activity_does_not_abort_others() {
        let mut bad = run(2, 4);
        bad[3].lon = None;
        let mut rows = run(1, 15);
        rows.extend(bad);
        rows.extend(run(3, 15));

        let output = process_telemetry(&rows, &SplitConfig::default()).unwrap();

        assert_eq!(output.summaries.len(), 3);
        assert_eq!(output.issues.len(), 1);
        assert_eq!(output.issues[0].activity_id(), Some(2));
        assert!(output.segments.iter().all(|s| s.activity_id != 2));
        assert!(output.segments.iter().any(|s| s.activity_id == 1));
        assert!(output.segments.iter().any(|s| s.activity_id == 3));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let mut rows = Vec::new();
        for id in (1..=40).rev() {
            rows.extend(run(id, 5 + id as usize));
        }
        rows[7].lat = None;

        let config = SplitConfig::default();
        let sequential = process_telemetry(&rows, &config).unwrap();
        let parallel = process_telemetry_parallel(&rows, &config).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.issues.len(), 1);
    }
}
