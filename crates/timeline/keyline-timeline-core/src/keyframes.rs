//! Keyframe data model.
//!
//! A [`KeyframeMap`] maps percent keys (`"0"`, `"50"`, `"100%"`) to the
//! property values declared at that point. Entries and properties keep the
//! order in which they were supplied; JSON input is read in document order.
//! Keys are kept as raw strings here and parsed when the map is compiled.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimelineError;

/// Property values declared at one percent key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe {
    key: String,
    properties: Vec<(String, f64)>,
}

impl Keyframe {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            properties: Vec::new(),
        }
    }

    /// The raw percent key, as supplied.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declare `value` for `property`. Re-declaring keeps the original position.
    pub fn set(&mut self, property: impl Into<String>, value: f64) {
        let property = property.into();
        match self.properties.iter_mut().find(|(name, _)| *name == property) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<f64> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, f64)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Sparse keyframe specification, in supplied order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeMap {
    frames: Vec<Keyframe>,
}

impl KeyframeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert:
    /// `KeyframeMap::new().with("0", [("x", 0.0)]).with("100", [("x", 10.0)])`
    pub fn with<K, P, I>(mut self, key: K, properties: I) -> Self
    where
        K: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = (P, f64)>,
    {
        self.insert(key, properties);
        self
    }

    /// Insert or extend the keyframe at `key`. An existing key keeps its position
    /// and gets the new properties merged in.
    pub fn insert<K, P, I>(&mut self, key: K, properties: I)
    where
        K: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = (P, f64)>,
    {
        let key = key.into();
        let idx = match self.frames.iter().position(|f| f.key == key) {
            Some(idx) => idx,
            None => {
                self.frames.push(Keyframe::new(key));
                self.frames.len() - 1
            }
        };
        let frame = &mut self.frames[idx];
        for (name, value) in properties {
            frame.set(name, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Keyframe> {
        self.frames.iter().find(|f| f.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Parse a percent key. Accepts surrounding whitespace and a trailing `%`.
pub(crate) fn parse_percent(key: &str) -> Result<i32, TimelineError> {
    let trimmed = key.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    digits
        .parse::<i32>()
        .map_err(|_| TimelineError::InvalidPercent {
            key: key.to_string(),
        })
}

/// Public API: parse a keyframes JSON object such as
/// `{ "0": { "position_x": 0 }, "100": { "position_x": 1 } }`.
pub fn parse_keyframes_json(s: &str) -> Result<KeyframeMap, TimelineError> {
    serde_json::from_str(s).map_err(|e| TimelineError::Parse(e.to_string()))
}

// Serde support: a JSON object of JSON objects, order preserved both ways.
impl Serialize for Keyframe {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (name, value) in &self.properties {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for KeyframeMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.frames.len()))?;
        for frame in &self.frames {
            map.serialize_entry(&frame.key, frame)?;
        }
        map.end()
    }
}

struct OrderedProperties(Vec<(String, f64)>);

impl<'de> Deserialize<'de> for OrderedProperties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = OrderedProperties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping property names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut frame = Keyframe::default();
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    frame.set(name, value);
                }
                Ok(OrderedProperties(frame.properties))
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

impl<'de> Deserialize<'de> for KeyframeMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyframesVisitor;

        impl<'de> Visitor<'de> for KeyframesVisitor {
            type Value = KeyframeMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping percent keys to property objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = KeyframeMap::new();
                while let Some((key, props)) = access.next_entry::<String, OrderedProperties>()? {
                    if key.trim().is_empty() {
                        return Err(de::Error::custom("empty keyframe key"));
                    }
                    map.insert(key, props.0);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(KeyframesVisitor)
    }
}
