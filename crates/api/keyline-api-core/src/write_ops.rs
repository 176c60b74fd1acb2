//! Write operations produced by the timeline to describe property updates
//! without touching a live target.
//!
//! WriteOp serializes to JSON as:
//!   { "path": "position_x", "value": 0.5 }
//!
//! WriteBatch is a simple Vec<WriteOp> with helpers. Order matters: when two
//! ops share a path the later one wins on `apply_to`.

use crate::{property_path::PropertyPath, target::PropertyTarget};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    pub path: PropertyPath,
    pub value: f64,
}

impl WriteOp {
    pub fn new(path: PropertyPath, value: f64) -> Self {
        Self { path, value }
    }
}

/// A batch of write operations, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch(Vec::new())
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The value the last op for `path` would leave behind.
    pub fn last_value(&self, path: &PropertyPath) -> Option<f64> {
        self.0
            .iter()
            .rev()
            .find(|op| &op.path == path)
            .map(|op| op.value)
    }

    /// Replay every op, in order, onto `target`.
    pub fn apply_to<T: PropertyTarget + ?Sized>(&self, target: &mut T) {
        for op in &self.0 {
            target.prepare(&op.path);
            target.write(&op.path, op.value);
        }
    }
}

/// Recording target: every write becomes an op.
impl PropertyTarget for WriteBatch {
    fn write(&mut self, path: &PropertyPath, value: f64) {
        self.push(WriteOp::new(path.clone(), value));
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ path: {}, value: {} }}", self.path, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> PropertyPath {
        PropertyPath::parse(s).unwrap()
    }

    #[test]
    fn writeop_json_shape() {
        let op = WriteOp::new(path("position_x"), 0.5);
        let v = serde_json::to_value(&op).unwrap();
        assert_eq!(v, json!({ "path": "position_x", "value": 0.5 }));
        let parsed: WriteOp = serde_json::from_value(v).unwrap();
        assert_eq!(parsed, op);
    }

    #[test]
    fn writebatch_json_array() {
        let mut b = WriteBatch::new();
        b.push(WriteOp::new(path("x"), 1.0));
        b.push(WriteOp::new(path("rotation_y"), 0.25));
        let s = serde_json::to_string(&b).unwrap();
        assert!(s.starts_with('['));
        let parsed: WriteBatch = serde_json::from_str(&s).unwrap();
        assert_eq!(b, parsed);
    }

    #[test]
    fn last_value_prefers_latest_op() {
        let mut b = WriteBatch::new();
        b.write(&path("x"), 1.0);
        b.write(&path("y"), 5.0);
        b.write(&path("x"), 2.0);
        assert_eq!(b.len(), 3);
        assert_eq!(b.last_value(&path("x")), Some(2.0));
        assert_eq!(b.last_value(&path("z")), None);
    }

    #[test]
    fn apply_replays_in_order() {
        let mut b = WriteBatch::new();
        b.write(&path("position_x"), 1.0);
        b.write(&path("position_x"), 3.0);
        let mut target = json!({});
        b.apply_to(&mut target);
        assert_eq!(target, json!({ "position": { "x": 3.0 } }));
    }

    #[test]
    fn display_is_compact() {
        let op = WriteOp::new(path("scale"), 2.0);
        assert_eq!(op.to_string(), "{ path: scale, value: 2 }");
    }
}
