//! Timeline configuration.

use keyline_api_core::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};

/// How keyframe entries are ordered before segments are built.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    /// Stable numeric sort of the percents.
    #[default]
    Ascending,
    /// Use the entries in the order they were supplied. Boundaries come from
    /// that order and every window is kept, inverted or empty ones included.
    /// The last window ends on the values declared at `final_percent`.
    AsProvided,
}

/// Compile-time options for a timeline. Every field has a default, so an
/// empty JSON object deserializes to `TimelineConfig::default()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub key_order: KeyOrder,
    /// Nesting delimiter inside property names (`position_x`).
    pub path_delimiter: char,
    /// Upper boundary used for the last keyframe's window.
    pub final_percent: i32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            key_order: KeyOrder::Ascending,
            path_delimiter: DEFAULT_DELIMITER,
            final_percent: 100,
        }
    }
}
