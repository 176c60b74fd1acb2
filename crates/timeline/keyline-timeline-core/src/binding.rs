//! Accessor table: reflection-free targets built from caller-supplied setters.
//!
//! Hosts that cannot expose a JSON-like object graph bind one closure per
//! property path instead. Writes to paths without a setter are dropped.

use std::fmt;

use hashbrown::HashMap;
use keyline_api_core::{PathError, PropertyPath, PropertyTarget};

use crate::segment::Segment;

type Setter<'a> = Box<dyn FnMut(f64) + 'a>;

#[derive(Default)]
pub struct AccessorTable<'a> {
    setters: HashMap<PropertyPath, Setter<'a>>,
}

impl<'a> AccessorTable<'a> {
    pub fn new() -> Self {
        Self {
            setters: HashMap::new(),
        }
    }

    /// Bind `setter` to `path`, replacing any previous binding.
    pub fn bind(&mut self, path: PropertyPath, setter: impl FnMut(f64) + 'a) {
        self.setters.insert(path, Box::new(setter));
    }

    /// Builder-style bind from a `_`-delimited path string.
    pub fn with(mut self, path: &str, setter: impl FnMut(f64) + 'a) -> Result<Self, PathError> {
        self.bind(PropertyPath::parse(path)?, setter);
        Ok(self)
    }

    pub fn contains(&self, path: &PropertyPath) -> bool {
        self.setters.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.setters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Distinct segment paths that have no setter, in segment order.
    pub fn unbound<'s>(&self, segments: &'s [Segment]) -> Vec<&'s PropertyPath> {
        let mut missing: Vec<&PropertyPath> = Vec::new();
        for segment in segments {
            if !self.contains(&segment.property) && !missing.contains(&&segment.property) {
                missing.push(&segment.property);
            }
        }
        missing
    }
}

impl PropertyTarget for AccessorTable<'_> {
    fn write(&mut self, path: &PropertyPath, value: f64) {
        match self.setters.get_mut(path) {
            Some(setter) => setter(value),
            None => log::trace!("no setter bound for '{path}'"),
        }
    }
}

impl fmt::Debug for AccessorTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<String> = self.setters.keys().map(|p| p.to_string()).collect();
        paths.sort();
        f.debug_struct("AccessorTable").field("paths", &paths).finish()
    }
}
