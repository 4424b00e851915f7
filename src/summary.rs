//! Activity summary aggregation.
//!
//! Reduces one activity's ordered telemetry to a single [`ActivitySummary`]:
//! heart-rate and cadence extremes, elevation range, cumulative ascent and
//! descent, and an estimated stride length.
//!
//! Stride length uses the device-reported cumulative distance (`dist_m`), not
//! the geodesic distance used for segmentation. The two are kept separate on
//! purpose: devices often compute distance with their own filtering, and
//! stride length should reflect what the device counted.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stats::{present, RunningStats};
use crate::{ActivityId, ActivityTelemetry, SplitConfig};

/// Scalar statistics for one activity.
///
/// Every optional field is `None` when its source column had no present value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActivitySummary {
    pub activity_id: ActivityId,
    pub hr_avg: Option<f64>,
    pub hr_max: Option<f64>,
    pub cad_avg: Option<f64>,
    pub cad_max: Option<f64>,
    pub elev_min: Option<f64>,
    pub elev_max: Option<f64>,
    /// Sum of positive altitude differences in meters
    pub total_ascent: Option<f64>,
    /// Sum of absolute negative altitude differences in meters
    pub total_descent: Option<f64>,
    /// Device-reported distance at the last sample
    pub total_dist_m: Option<f64>,
    pub stride_len_m: Option<f64>,
}

/// Compute the summary record for one activity.
///
/// Never fails: absent inputs degrade to `None` fields.
///
/// # Example
/// ```
/// use telemetry_splits::{summarize_activity, ActivityTelemetry, SplitConfig, TelemetrySample};
///
/// let activity = ActivityTelemetry::new(1, vec![
///     TelemetrySample::new(1, 0.0, 0.0, 0.0).with_altitude(100.0).with_heart_rate(120.0),
///     TelemetrySample::new(1, 1.0, 0.0, 0.0).with_altitude(104.0).with_heart_rate(140.0),
///     TelemetrySample::new(1, 2.0, 0.0, 0.0).with_altitude(101.0),
/// ]);
///
/// let summary = summarize_activity(&activity, &SplitConfig::default());
/// assert_eq!(summary.hr_avg, Some(130.0));
/// assert_eq!(summary.total_ascent, Some(4.0));
/// assert_eq!(summary.total_descent, Some(3.0));
/// ```
pub fn summarize_activity(activity: &ActivityTelemetry, config: &SplitConfig) -> ActivitySummary {
    let samples = &activity.samples;

    let hr: RunningStats = samples.iter().map(|s| s.hr_bpm).collect();
    let cad: RunningStats = samples.iter().map(|s| s.cadence).collect();
    let elev: RunningStats = samples.iter().map(|s| s.alt_m).collect();

    let (total_ascent, total_descent) = match ascent_descent(activity) {
        Some((ascent, descent)) => (Some(ascent), Some(descent)),
        None => (None, None),
    };

    let total_dist_m = match samples.last() {
        Some(last) => present(last.dist_m),
        None => Some(0.0),
    };

    let steps = estimated_steps(activity);
    let stride_len_m = if steps > 0.0 {
        total_dist_m.map(|dist| dist / (config.cadence_convention.stride_divisor() * steps))
    } else {
        None
    };

    ActivitySummary {
        activity_id: activity.activity_id,
        hr_avg: hr.mean(),
        hr_max: hr.max(),
        cad_avg: cad.mean(),
        cad_max: cad.max(),
        elev_min: elev.min(),
        elev_max: elev.max(),
        total_ascent,
        total_descent,
        total_dist_m,
        stride_len_m,
    }
}

/// Total ascent and descent over present altitudes.
///
/// Differences are taken between consecutive present altitudes, so a gap in
/// the altitude column bridges to the next present value. Returns `None` when
/// no altitude is present.
fn ascent_descent(activity: &ActivityTelemetry) -> Option<(f64, f64)> {
    let mut altitudes = activity.samples.iter().filter_map(|s| present(s.alt_m));
    let mut prev = altitudes.next()?;

    let mut ascent = 0.0;
    let mut descent = 0.0;
    for alt in altitudes {
        let diff = alt - prev;
        if diff > 0.0 {
            ascent += diff;
        } else if diff < 0.0 {
            descent -= diff;
        }
        prev = alt;
    }

    Some((ascent, descent))
}

/// Estimated foot-strike count: Σ cadence[i] × Δt[i] / 60.
///
/// Δt[i] is the time since the previous sample (the first sample has none, so
/// contributes zero). A term is skipped when its cadence, its time, or the
/// previous sample's time is absent.
fn estimated_steps(activity: &ActivityTelemetry) -> f64 {
    activity
        .samples
        .windows(2)
        .filter_map(|w| {
            let cadence = present(w[1].cadence)?;
            let dt = present(w[1].time_s)? - present(w[0].time_s)?;
            Some(cadence * dt / 60.0)
        })
        .sum()
}
