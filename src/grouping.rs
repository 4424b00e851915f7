//! Grouping of a telemetry table by activity.
//!
//! Rows of one activity keep the order they were received in. Activities are
//! returned in order of first appearance. Rows of different activities may be
//! interleaved in the input.

use std::collections::HashMap;

use crate::{ActivityId, ActivityTelemetry, TelemetrySample};

/// Split a telemetry table into one ordered sample sequence per activity.
///
/// Never re-sorts samples by time or distance: ordering within an activity is
/// the input ordering. No group is ever empty.
///
/// # Example
/// ```
/// use telemetry_splits::{group_by_activity, TelemetrySample};
///
/// let rows = vec![
///     TelemetrySample::new(1, 0.0, 0.0, 0.0),
///     TelemetrySample::new(2, 0.0, 1.0, 1.0),
///     TelemetrySample::new(1, 1.0, 0.0, 0.0001),
/// ];
///
/// let activities = group_by_activity(&rows);
/// assert_eq!(activities.len(), 2);
/// assert_eq!(activities[0].activity_id, 1);
/// assert_eq!(activities[0].samples.len(), 2);
/// ```
pub fn group_by_activity(samples: &[TelemetrySample]) -> Vec<ActivityTelemetry> {
    let mut index: HashMap<ActivityId, usize> = HashMap::new();
    let mut groups: Vec<ActivityTelemetry> = Vec::new();

    for sample in samples {
        let slot = *index.entry(sample.activity_id).or_insert_with(|| {
            groups.push(ActivityTelemetry::new(sample.activity_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].samples.push(*sample);
    }

    groups
}
