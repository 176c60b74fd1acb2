//! Segment: linear interpolation of one property between two percent boundaries.

use keyline_api_core::PropertyPath;
use serde::{Deserialize, Serialize};

/// Immutable record produced by the compiler. Field names serialize in
/// camelCase (`percentMin`, ...) for inspection from JS hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub property: PropertyPath,
    pub percent_min: i32,
    pub percent_max: i32,
    pub value_min: f64,
    pub value_max: f64,
}

/// Linearly map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
/// No clamping; callers pick the branch.
#[inline]
pub fn map_range(in_min: f64, in_max: f64, out_min: f64, out_max: f64, value: f64) -> f64 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

impl Segment {
    /// Value this segment writes at `progress`, if any.
    ///
    /// - strictly inside `(percent_min, percent_max)`: linear interpolation
    /// - at or past `percent_max`: `value_max`
    /// - otherwise nothing (the segment has not started)
    ///
    /// Inverted windows never interpolate and write `value_max` from
    /// `percent_max` on.
    pub fn resolve(&self, progress: f64) -> Option<f64> {
        let min = f64::from(self.percent_min);
        let max = f64::from(self.percent_max);
        if progress > min && progress < max {
            Some(map_range(
                min,
                max,
                self.value_min,
                self.value_max,
                progress,
            ))
        } else if progress >= max {
            Some(self.value_max)
        } else {
            None
        }
    }

    /// True while `progress` is strictly inside the window.
    pub fn is_active(&self, progress: f64) -> bool {
        progress > f64::from(self.percent_min) && progress < f64::from(self.percent_max)
    }

    /// Flat segments hold one value across the whole window.
    pub fn is_flat(&self) -> bool {
        self.value_min == self.value_max
    }

    /// Signed window width. Negative for inverted windows.
    pub fn span(&self) -> i64 {
        i64::from(self.percent_max) - i64::from(self.percent_min)
    }
}
