//! # Telemetry Splits
//!
//! Activity summaries and fixed-distance splits from raw GPS/biometric telemetry.
//!
//! This library provides:
//! - Per-activity summary statistics (heart rate, cadence, elevation, stride length)
//! - Geodesic segmentation of each activity into kilometer splits with pace
//! - Parallel processing for batch operations
//!
//! Both computations are pure functions of one activity's ordered samples. The
//! library does no I/O: callers hand in a telemetry table and receive the
//! summary table, the segment table, and any per-activity issues.
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel processing with rayon
//! - **`serde`** - Derive `Serialize`/`Deserialize` on samples and output records
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use telemetry_splits::{process_telemetry, SplitConfig, TelemetrySample};
//!
//! // Three samples ~1 km apart along the equator
//! let samples = vec![
//!     TelemetrySample::new(42, 0.0, 0.0, 0.0).with_cadence(80.0),
//!     TelemetrySample::new(42, 300.0, 0.0, 0.009).with_cadence(80.0),
//!     TelemetrySample::new(42, 600.0, 0.0, 0.018).with_cadence(80.0),
//! ];
//!
//! let output = process_telemetry(&samples, &SplitConfig::default()).unwrap();
//!
//! assert_eq!(output.summaries.len(), 1);
//! for segment in &output.segments {
//!     println!(
//!         "km {}: {:.0}m, pace {:?} s/km",
//!         segment.segment_number, segment.segment_distance_m, segment.pace_sec_per_km
//!     );
//! }
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, SplitError};

// Geographic utilities (geodesic and haversine distance)
pub mod geo_utils;

// Order-preserving grouping of telemetry rows by activity
pub mod grouping;
pub use grouping::group_by_activity;

mod stats;

// Activity summary aggregation
pub mod summary;
pub use summary::{summarize_activity, ActivitySummary};

// Geodesic kilometer segmentation
pub mod splits;
pub use splits::{annotate_activity, segment_activity, SampleAnnotation, SegmentRecord};

// Whole-table pipeline
pub mod batch;
#[cfg(feature = "parallel")]
pub use batch::process_telemetry_parallel;
pub use batch::{process_activities, process_telemetry, SplitOutput};

// ============================================================================
// Core Types
// ============================================================================

/// Identifier of a recorded activity.
pub type ActivityId = i64;

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use telemetry_splits::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// One timestamped telemetry observation.
///
/// Every field except `activity_id` may be absent. Absence is distinct from
/// zero: an absent heart rate is skipped by averages, a zero heart rate is not.
/// Position (`lat`/`lon`) is required for segmentation; its absence is reported
/// as [`SplitError::MissingPosition`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetrySample {
    pub activity_id: ActivityId,
    /// Seconds since the start of the activity
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_s: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lat: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lon: Option<f64>,
    /// Device-reported cumulative distance in meters
    #[cfg_attr(feature = "serde", serde(default))]
    pub dist_m: Option<f64>,
    /// Altitude in meters
    #[cfg_attr(feature = "serde", serde(default))]
    pub alt_m: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hr_bpm: Option<f64>,
    /// Cadence in strikes per minute (see [`CadenceConvention`])
    #[cfg_attr(feature = "serde", serde(default))]
    pub cadence: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub watts: Option<f64>,
}

impl TelemetrySample {
    /// Create a sample with time and position; all metric fields absent.
    pub fn new(activity_id: ActivityId, time_s: f64, lat: f64, lon: f64) -> Self {
        Self {
            activity_id,
            time_s: Some(time_s),
            lat: Some(lat),
            lon: Some(lon),
            dist_m: None,
            alt_m: None,
            hr_bpm: None,
            cadence: None,
            watts: None,
        }
    }

    /// Create a sample with every field absent.
    pub fn empty(activity_id: ActivityId) -> Self {
        Self {
            activity_id,
            time_s: None,
            lat: None,
            lon: None,
            dist_m: None,
            alt_m: None,
            hr_bpm: None,
            cadence: None,
            watts: None,
        }
    }

    pub fn with_distance(mut self, dist_m: f64) -> Self {
        self.dist_m = Some(dist_m);
        self
    }

    pub fn with_altitude(mut self, alt_m: f64) -> Self {
        self.alt_m = Some(alt_m);
        self
    }

    pub fn with_heart_rate(mut self, hr_bpm: f64) -> Self {
        self.hr_bpm = Some(hr_bpm);
        self
    }

    pub fn with_cadence(mut self, cadence: f64) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn with_watts(mut self, watts: f64) -> Self {
        self.watts = Some(watts);
        self
    }

    /// The sample position, if both coordinates are present.
    pub fn position(&self) -> Option<GpsPoint> {
        Some(GpsPoint::new(self.lat?, self.lon?))
    }
}

/// The ordered telemetry of a single activity.
///
/// Sample order is the order received from the device and is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTelemetry {
    pub activity_id: ActivityId,
    pub samples: Vec<TelemetrySample>,
}

impl ActivityTelemetry {
    pub fn new(activity_id: ActivityId, samples: Vec<TelemetrySample>) -> Self {
        Self { activity_id, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// How point-to-point distance is measured for segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMetric {
    /// Inverse geodesic on the WGS84 ellipsoid
    #[default]
    Geodesic,
    /// Great circle on a sphere of mean Earth radius
    Haversine,
}

/// How the device reports cadence.
///
/// Stride length is `total_dist / (divisor × steps)` where steps is the
/// cadence-weighted elapsed time. Which divisor is right depends on whether the
/// source counts one leg or both; this is a property of the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CadenceConvention {
    /// Cadence counts strikes of one leg (running cadence as most watches
    /// export it). Stride divisor is 2.
    #[default]
    SingleLeg,
    /// Cadence already counts strikes of both legs. Stride divisor is 1.
    FullBody,
}

impl CadenceConvention {
    /// Divisor applied to the estimated step count when computing stride length.
    pub fn stride_divisor(&self) -> f64 {
        match self {
            CadenceConvention::SingleLeg => 2.0,
            CadenceConvention::FullBody => 1.0,
        }
    }
}

/// Configuration for summary and segmentation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitConfig {
    /// Length of one segment bucket in meters.
    /// Default: 1000.0 (kilometer splits)
    pub segment_length_m: f64,

    /// Distance metric used for step distances, segmentation and pace.
    /// Default: Geodesic
    pub distance_metric: DistanceMetric,

    /// Cadence unit interpretation used for stride length.
    /// Default: SingleLeg
    pub cadence_convention: CadenceConvention,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            segment_length_m: 1000.0,
            distance_metric: DistanceMetric::Geodesic,
            cadence_convention: CadenceConvention::SingleLeg,
        }
    }
}

impl SplitConfig {
    /// Check that the configuration can be used for bucketing.
    pub fn validate(&self) -> Result<()> {
        if !self.segment_length_m.is_finite() || self.segment_length_m <= 0.0 {
            return Err(SplitError::InvalidSegmentLength(self.segment_length_m));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
