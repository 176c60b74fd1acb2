//! Keyline Timeline Core (engine-agnostic)
//!
//! Percentage-keyed keyframe interpolation. A sparse [`KeyframeMap`] is
//! compiled once into per-property [`Segment`]s; every progress update then
//! resolves each segment and writes the result into a [`PropertyTarget`].

pub mod binding;
pub mod compiler;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod keyframes;
pub mod segment;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use binding::AccessorTable;
pub use compiler::compile;
pub use config::{KeyOrder, TimelineConfig};
pub use error::TimelineError;
pub use evaluator::{evaluate, sample, value_at};
pub use keyframes::{parse_keyframes_json, Keyframe, KeyframeMap};
pub use segment::{map_range, Segment};
pub use timeline::{Timeline, TimelineBuilder};
pub use keyline_api_core::{
    IntermediatePolicy, PropertyBag, PropertyPath, PropertyTarget, WriteBatch, WriteOp,
};
