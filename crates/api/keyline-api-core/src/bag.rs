//! Set-at-path over a schema-agnostic map-of-maps (JSON objects).
//!
//! Writing `position_x` into `{}` creates `{ "position": {} }` first and then
//! stores `x`. What happens when a step on the way already holds something
//! that is not an object is decided by [`IntermediatePolicy`]:
//! - `Replace` swaps the value for a fresh empty object (siblings stored inside
//!   the old value are lost).
//! - `Preserve` leaves the value alone and drops the write.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::property_path::PropertyPath;
use crate::target::PropertyTarget;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntermediatePolicy {
    /// Overwrite non-object intermediates with an empty object.
    #[default]
    Replace,
    /// Keep non-object intermediates and skip the write.
    Preserve,
}

/// Result of a single set-at-path call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// A non-object value at `depth` (0 = root) stopped the write.
    Blocked { depth: usize },
}

fn as_container(
    slot: &mut JsonValue,
    policy: IntermediatePolicy,
    depth: usize,
) -> Result<&mut Map<String, JsonValue>, usize> {
    if !slot.is_object() {
        match policy {
            IntermediatePolicy::Replace => {
                log::debug!("replacing non-object {slot} at depth {depth} with an empty object");
                *slot = JsonValue::Object(Map::new());
            }
            IntermediatePolicy::Preserve => {
                log::debug!("keeping non-object {slot} at depth {depth}; write skipped");
                return Err(depth);
            }
        }
    }
    match slot {
        JsonValue::Object(map) => Ok(map),
        _ => Err(depth),
    }
}

/// Walk (and create) every container above the leaf of `path`.
/// Returns the map that owns the leaf, or the depth of the blocking value.
pub fn ensure_containers<'a>(
    root: &'a mut JsonValue,
    path: &PropertyPath,
    policy: IntermediatePolicy,
) -> Result<&'a mut Map<String, JsonValue>, usize> {
    let mut current = as_container(root, policy, 0)?;
    for (idx, key) in path.parents().iter().enumerate() {
        let slot = current
            .entry(key.clone())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        current = as_container(slot, policy, idx + 1)?;
    }
    Ok(current)
}

/// Store `value` at `path`, creating containers on demand.
/// Non-finite values are stored as `null` (JSON has no NaN).
pub fn set_at_path(
    root: &mut JsonValue,
    path: &PropertyPath,
    value: f64,
    policy: IntermediatePolicy,
) -> WriteOutcome {
    match ensure_containers(root, path, policy) {
        Ok(map) => {
            map.insert(path.leaf().to_string(), JsonValue::from(value));
            WriteOutcome::Written
        }
        Err(depth) => WriteOutcome::Blocked { depth },
    }
}

/// Read the value stored at `path`, if every step exists.
pub fn lookup<'a>(root: &'a JsonValue, path: &PropertyPath) -> Option<&'a JsonValue> {
    path.keys().try_fold(root, |node, key| node.as_object()?.get(key))
}

/// A JSON object graph paired with the intermediate policy used when writing.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyBag {
    root: JsonValue,
    policy: IntermediatePolicy,
}

impl Default for PropertyBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyBag {
    /// Empty bag with the default (`Replace`) policy.
    pub fn new() -> Self {
        Self::from_json(JsonValue::Object(Map::new()))
    }

    pub fn from_json(root: JsonValue) -> Self {
        Self {
            root,
            policy: IntermediatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: IntermediatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> IntermediatePolicy {
        self.policy
    }

    /// Numeric value at `path`, if present and numeric.
    pub fn get(&self, path: &PropertyPath) -> Option<f64> {
        lookup(&self.root, path).and_then(JsonValue::as_f64)
    }

    /// Raw JSON at `path`.
    pub fn get_value(&self, path: &PropertyPath) -> Option<&JsonValue> {
        lookup(&self.root, path)
    }

    /// Write `value` at `path` under this bag's policy.
    pub fn set(&mut self, path: &PropertyPath, value: f64) -> WriteOutcome {
        set_at_path(&mut self.root, path, value, self.policy)
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.root
    }

    pub fn as_json_mut(&mut self) -> &mut JsonValue {
        &mut self.root
    }

    pub fn into_json(self) -> JsonValue {
        self.root
    }
}

impl PropertyTarget for PropertyBag {
    fn prepare(&mut self, path: &PropertyPath) {
        if let Err(depth) = ensure_containers(&mut self.root, path, self.policy) {
            log::trace!("containers for '{path}' blocked at depth {depth}");
        }
    }

    fn write(&mut self, path: &PropertyPath, value: f64) {
        if let WriteOutcome::Blocked { depth } = self.set(path, value) {
            log::trace!("write to '{path}' blocked at depth {depth}");
        }
    }
}
