//! Missing-value-aware running statistics.
//!
//! Telemetry columns are sparse: a device may drop heart rate for a few seconds
//! or never record power at all. [`RunningStats`] only counts present, finite
//! values, so an all-absent column yields `None` instead of `0.0` or `NaN`.

/// Accumulates count, sum, min and max over present values.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunningStats {
    count: usize,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl RunningStats {
    /// Add a value if it is present and finite.
    #[inline]
    pub(crate) fn push(&mut self, value: Option<f64>) {
        let Some(v) = present(value) else {
            return;
        };
        self.count += 1;
        self.sum += v;
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    pub(crate) fn min(&self) -> Option<f64> {
        self.min
    }

    pub(crate) fn max(&self) -> Option<f64> {
        self.max
    }
}

impl FromIterator<Option<f64>> for RunningStats {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut stats = RunningStats::default();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Treat non-finite values (NaN, ±inf) as absent.
#[inline]
pub(crate) fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
