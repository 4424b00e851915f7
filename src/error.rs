//! Error types for telemetry processing.
//!
//! Absent metric values are never errors: they surface as `None` fields on the
//! output records. The variants here cover the two things that cannot be
//! degraded gracefully: a sample without a usable position, and a
//! configuration that makes bucketing meaningless.

use thiserror::Error;

use crate::ActivityId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SplitError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    /// Latitude or longitude is absent. Position is mandatory for segmentation.
    #[error("activity {activity_id}: sample {sample_index} has no position")]
    MissingPosition {
        activity_id: ActivityId,
        sample_index: usize,
    },

    /// Position is present but not a valid WGS84 coordinate.
    #[error(
        "activity {activity_id}: sample {sample_index} has invalid position ({latitude}, {longitude})"
    )]
    InvalidPosition {
        activity_id: ActivityId,
        sample_index: usize,
        latitude: f64,
        longitude: f64,
    },

    #[error("segment length must be a positive, finite number of meters (got {0})")]
    InvalidSegmentLength(f64),
}

impl SplitError {
    /// The activity that triggered this error, if it is scoped to one.
    pub fn activity_id(&self) -> Option<ActivityId> {
        match self {
            SplitError::MissingPosition { activity_id, .. }
            | SplitError::InvalidPosition { activity_id, .. } => Some(*activity_id),
            SplitError::InvalidSegmentLength(_) => None,
        }
    }
}
