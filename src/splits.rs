//! Geodesic segmentation into fixed-distance splits.
//!
//! Each activity is cut into consecutive segments of `segment_length_m`
//! (1000 m by default) of geodesic distance:
//!
//! 1. Step distance: the distance from the previous sample's position to this
//!    one, zero for the first sample.
//! 2. Cumulative distance: running sum of step distances.
//! 3. Bucket: `floor(cumulative / segment_length) + 1`. A sample exactly on a
//!    boundary opens the next bucket.
//! 4. Segments: the contiguous runs of equal bucket, numbered 1, 2, 3, ...
//!
//! Step distance is attributed to the segment of the sample the step ends at,
//! so the segment distances of an activity sum to its full geodesic length.
//!
//! The device-reported `dist_m` column plays no part here.

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};
use crate::geo_utils::step_distances;
use crate::stats::RunningStats;
use crate::{ActivityId, ActivityTelemetry, GpsPoint, SplitConfig, TelemetrySample};

/// Per-sample segmentation result, aligned with the activity's samples.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleAnnotation {
    /// Index of the sample within its activity
    pub sample_index: usize,
    /// Distance from the previous sample in meters (0 for the first sample)
    pub step_distance_m: f64,
    /// Running sum of step distances in meters
    pub cumulative_distance_m: f64,
    /// Raw distance bucket, `floor(cumulative / segment_length) + 1`
    pub distance_bucket: u64,
    /// Gapless segment number, starting at 1
    pub segment_number: u32,
}

/// One fixed-distance split of an activity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentRecord {
    pub activity_id: ActivityId,
    pub segment_number: u32,
    /// Earliest present `time_s` in the segment
    pub segment_start_time: Option<f64>,
    /// Latest present `time_s` in the segment
    pub segment_end_time: Option<f64>,
    /// Position of the first sample in the segment (`None` only for the
    /// degenerate segment of an empty activity)
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    /// Cumulative geodesic distance at the last sample of the segment
    pub cumulative_distance_m: f64,
    pub avg_hr_bpm: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub avg_watts: Option<f64>,
    /// Geodesic distance covered within the segment
    pub segment_distance_m: f64,
    pub duration_s: Option<f64>,
    /// `None` when the segment covers no distance or has no timing
    pub pace_sec_per_km: Option<f64>,
    /// Number of telemetry samples in the segment
    pub sample_count: usize,
}

/// Compute step distance, cumulative distance and segment number for every sample.
///
/// Fails if any sample lacks a valid position. Returns an empty vector for an
/// empty activity.
pub fn annotate_activity(
    activity: &ActivityTelemetry,
    config: &SplitConfig,
) -> Result<Vec<SampleAnnotation>> {
    config.validate()?;
    let points = positions(activity)?;
    Ok(annotate_points(&points, config))
}

/// Cut an activity into fixed-distance segments.
///
/// Segments come back ordered by `segment_number`, covering every sample
/// exactly once. An activity with fewer than two samples yields a single
/// degenerate segment with zero distance and no pace; for an empty activity
/// that segment has no start position and a `sample_count` of 0.
///
/// # Example
/// ```
/// use telemetry_splits::{segment_activity, ActivityTelemetry, SplitConfig, TelemetrySample};
///
/// // 0.001 degrees of longitude at the equator is ~111 m
/// let samples: Vec<TelemetrySample> = (0..25)
///     .map(|i| TelemetrySample::new(1, i as f64 * 30.0, 0.0, i as f64 * 0.001))
///     .collect();
///
/// let segments = segment_activity(&ActivityTelemetry::new(1, samples), &SplitConfig::default()).unwrap();
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[0].segment_number, 1);
/// ```
pub fn segment_activity(
    activity: &ActivityTelemetry,
    config: &SplitConfig,
) -> Result<Vec<SegmentRecord>> {
    config.validate()?;
    segment_unchecked(activity, config)
}

/// Segmentation for callers that already validated `config`.
pub(crate) fn segment_unchecked(
    activity: &ActivityTelemetry,
    config: &SplitConfig,
) -> Result<Vec<SegmentRecord>> {
    let points = positions(activity)?;
    let annotations = annotate_points(&points, config);

    let mut segments: Vec<SegmentRecord> = Vec::new();
    let mut current: Option<SegmentBuilder> = None;

    for (annotation, (sample, point)) in annotations
        .iter()
        .zip(activity.samples.iter().zip(points.iter()))
    {
        let starts_new = current
            .as_ref()
            .map_or(true, |b| b.segment_number != annotation.segment_number);
        if starts_new {
            let next = SegmentBuilder::new(annotation.segment_number, Some(*point));
            if let Some(done) = current.replace(next) {
                segments.push(done.build(activity.activity_id));
            }
        }

        if let Some(builder) = current.as_mut() {
            builder.add(sample, annotation);
        }
    }

    match current {
        Some(done) => segments.push(done.build(activity.activity_id)),
        None => segments.push(SegmentBuilder::new(1, None).build(activity.activity_id)),
    }

    debug!(
        "[TelemetrySplits] activity {}: {} samples -> {} segments ({:.0}m)",
        activity.activity_id,
        activity.samples.len(),
        segments.len(),
        segments.last().map_or(0.0, |s| s.cumulative_distance_m)
    );

    Ok(segments)
}

/// Pace in seconds per kilometer, guarded against zero distance.
///
/// Returns `None` instead of infinity when nothing was covered.
pub fn pace_sec_per_km(duration_s: Option<f64>, distance_m: f64) -> Option<f64> {
    if distance_m <= 0.0 {
        return None;
    }
    duration_s
        .map(|d| d / (distance_m / 1000.0))
        .filter(|p| p.is_finite())
}

/// Extract every sample position, failing on the first unusable one.
fn positions(activity: &ActivityTelemetry) -> Result<Vec<GpsPoint>> {
    activity
        .samples
        .iter()
        .enumerate()
        .map(|(sample_index, sample)| {
            let point = sample.position().ok_or(SplitError::MissingPosition {
                activity_id: activity.activity_id,
                sample_index,
            })?;
            if !point.is_valid() {
                return Err(SplitError::InvalidPosition {
                    activity_id: activity.activity_id,
                    sample_index,
                    latitude: point.latitude,
                    longitude: point.longitude,
                });
            }
            Ok(point)
        })
        .collect()
}

fn annotate_points(points: &[GpsPoint], config: &SplitConfig) -> Vec<SampleAnnotation> {
    let steps = step_distances(points, config.distance_metric);

    let mut cumulative = 0.0;
    let mut segment_number = 0;
    let mut last_bucket: Option<u64> = None;

    steps
        .into_iter()
        .enumerate()
        .map(|(sample_index, step)| {
            cumulative += step;
            // Saturating float cast; tiny segment lengths can exceed u32 range
            let bucket = ((cumulative / config.segment_length_m).floor() as u64).saturating_add(1);
            // A step longer than one segment skips buckets; numbering stays dense
            if last_bucket != Some(bucket) {
                segment_number += 1;
                last_bucket = Some(bucket);
            }
            SampleAnnotation {
                sample_index,
                step_distance_m: step,
                cumulative_distance_m: cumulative,
                distance_bucket: bucket,
                segment_number,
            }
        })
        .collect()
}

struct SegmentBuilder {
    segment_number: u32,
    start: Option<GpsPoint>,
    time: RunningStats,
    hr: RunningStats,
    cadence: RunningStats,
    watts: RunningStats,
    distance_m: f64,
    cumulative_distance_m: f64,
    sample_count: usize,
}

impl SegmentBuilder {
    fn new(segment_number: u32, start: Option<GpsPoint>) -> Self {
        Self {
            segment_number,
            start,
            time: RunningStats::default(),
            hr: RunningStats::default(),
            cadence: RunningStats::default(),
            watts: RunningStats::default(),
            distance_m: 0.0,
            cumulative_distance_m: 0.0,
            sample_count: 0,
        }
    }

    fn add(&mut self, sample: &TelemetrySample, annotation: &SampleAnnotation) {
        self.time.push(sample.time_s);
        self.hr.push(sample.hr_bpm);
        self.cadence.push(sample.cadence);
        self.watts.push(sample.watts);
        self.distance_m += annotation.step_distance_m;
        self.cumulative_distance_m = annotation.cumulative_distance_m;
        self.sample_count += 1;
    }

    fn build(self, activity_id: ActivityId) -> SegmentRecord {
        let segment_start_time = self.time.min();
        let segment_end_time = self.time.max();
        let duration_s = match (segment_start_time, segment_end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        };

        SegmentRecord {
            activity_id,
            segment_number: self.segment_number,
            segment_start_time,
            segment_end_time,
            start_lat: self.start.map(|p| p.latitude),
            start_lon: self.start.map(|p| p.longitude),
            cumulative_distance_m: self.cumulative_distance_m,
            avg_hr_bpm: self.hr.mean(),
            avg_cadence: self.cadence.mean(),
            avg_watts: self.watts.mean(),
            segment_distance_m: self.distance_m,
            duration_s,
            pace_sec_per_km: pace_sec_per_km(duration_s, self.distance_m),
            sample_count: self.sample_count,
        }
    }
}
