//! The write seam between the timeline and whatever it animates.
//!
//! Adapters implement [`PropertyTarget`] for their own object graphs. The core
//! ships implementations for JSON values ([`serde_json::Value`] and
//! [`crate::PropertyBag`]) and for recording into a [`crate::WriteBatch`].

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::bag::{set_at_path, IntermediatePolicy};
use crate::property_path::PropertyPath;

pub trait PropertyTarget {
    /// Create any missing containers on the way to the leaf of `path`.
    /// Called for every segment on every update, even when nothing is written.
    fn prepare(&mut self, _path: &PropertyPath) {}

    /// Store `value` at the leaf of `path`.
    fn write(&mut self, path: &PropertyPath, value: f64);
}

impl<T: PropertyTarget + ?Sized> PropertyTarget for &mut T {
    fn prepare(&mut self, path: &PropertyPath) {
        (**self).prepare(path)
    }

    fn write(&mut self, path: &PropertyPath, value: f64) {
        (**self).write(path, value)
    }
}

impl<T: PropertyTarget + ?Sized> PropertyTarget for Box<T> {
    fn prepare(&mut self, path: &PropertyPath) {
        (**self).prepare(path)
    }

    fn write(&mut self, path: &PropertyPath, value: f64) {
        (**self).write(path, value)
    }
}

/// Shared targets: the renderer keeps one handle, the timeline another.
/// Panics if the target is already borrowed while an update runs.
impl<T: PropertyTarget + ?Sized> PropertyTarget for Rc<RefCell<T>> {
    fn prepare(&mut self, path: &PropertyPath) {
        self.borrow_mut().prepare(path)
    }

    fn write(&mut self, path: &PropertyPath, value: f64) {
        self.borrow_mut().write(path, value)
    }
}

/// Plain JSON targets always use [`IntermediatePolicy::Replace`].
impl PropertyTarget for JsonValue {
    fn prepare(&mut self, path: &PropertyPath) {
        crate::bag::ensure_containers(self, path, IntermediatePolicy::Replace).ok();
    }

    fn write(&mut self, path: &PropertyPath, value: f64) {
        set_at_path(self, path, value, IntermediatePolicy::Replace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_value_creates_nested_containers() {
        let mut target = json!({});
        let path = PropertyPath::parse("position_x").unwrap();
        target.prepare(&path);
        assert_eq!(target, json!({ "position": {} }));
        target.write(&path, 2.5);
        assert_eq!(target, json!({ "position": { "x": 2.5 } }));
    }

    #[test]
    fn json_value_prepare_replaces_scalar_intermediate() {
        let mut target = json!({ "position": 7 });
        target.prepare(&PropertyPath::parse("position_offset_x").unwrap());
        assert_eq!(target, json!({ "position": { "offset": {} } }));
    }

    #[test]
    fn shared_target_sees_writes() {
        let shared = Rc::new(RefCell::new(json!({})));
        let mut handle = Rc::clone(&shared);
        handle.write(&PropertyPath::parse("scale").unwrap(), 3.0);
        assert_eq!(*shared.borrow(), json!({ "scale": 3.0 }));
    }

    #[test]
    fn mutable_reference_forwards() {
        fn write_through<T: PropertyTarget>(mut target: T) {
            target.write(&PropertyPath::parse("a_b_c").unwrap(), 1.0);
        }

        let mut target = json!({});
        write_through(&mut target);
        assert_eq!(target, json!({ "a": { "b": { "c": 1.0 } } }));
    }
}
