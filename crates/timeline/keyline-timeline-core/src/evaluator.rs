//! Progress evaluator: resolve every segment at a progress value and write
//! the results into a target.
//!
//! Every call walks the whole segment list in order. Containers for each
//! segment's path are prepared even when the segment does not write, and a
//! later segment overwrites an earlier one for the same property, so the
//! furthest-along segment determines the final value.

use keyline_api_core::{PropertyPath, PropertyTarget, WriteBatch};

use crate::segment::Segment;

/// Apply `segments` at `progress` to `target`. Returns the number of writes.
pub fn evaluate<T: PropertyTarget + ?Sized>(
    segments: &[Segment],
    progress: f64,
    target: &mut T,
) -> usize {
    let mut writes = 0;
    for segment in segments {
        target.prepare(&segment.property);
        if let Some(value) = segment.resolve(progress) {
            target.write(&segment.property, value);
            writes += 1;
        }
    }
    writes
}

/// Evaluate into a fresh [`WriteBatch`] instead of a live target.
pub fn sample(segments: &[Segment], progress: f64) -> WriteBatch {
    let mut batch = WriteBatch::new();
    evaluate(segments, progress, &mut batch);
    batch
}

/// The value `path` would hold after an update at `progress`, or `None` if no
/// segment writes it.
pub fn value_at(segments: &[Segment], path: &PropertyPath, progress: f64) -> Option<f64> {
    segments
        .iter()
        .filter(|s| &s.property == path)
        .filter_map(|s| s.resolve(progress))
        .last()
}
