//! Construction errors.

use keyline_api_core::PathError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("target object is required")]
    MissingTarget,
    #[error("keyframes object is required")]
    MissingKeyframes,
    #[error("keyframes object has no entries")]
    EmptyKeyframes,
    #[error("keyframe key '{key}' is not an integer percent")]
    InvalidPercent { key: String },
    #[error("keyframe percent {percent} is declared more than once")]
    DuplicatePercent { percent: i32 },
    #[error("invalid property '{path}' in keyframe '{key}': {source}")]
    InvalidPath {
        key: String,
        path: String,
        #[source]
        source: PathError,
    },
    #[error("keyframes parse error: {0}")]
    Parse(String),
}

impl TimelineError {
    /// Stable reason code, safe to match on from adapters.
    pub fn code(&self) -> &'static str {
        match self {
            TimelineError::MissingTarget => "missing_target",
            TimelineError::MissingKeyframes => "missing_keyframes",
            TimelineError::EmptyKeyframes => "empty_keyframes",
            TimelineError::InvalidPercent { .. } => "invalid_percent",
            TimelineError::DuplicatePercent { .. } => "duplicate_percent",
            TimelineError::InvalidPath { .. } => "invalid_path",
            TimelineError::Parse(_) => "parse",
        }
    }
}
