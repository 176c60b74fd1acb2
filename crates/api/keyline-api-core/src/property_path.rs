//! PropertyPath parsing and formatting.
//!
//! A property path names a leaf inside a nested target as an ordered list of
//! keys. Keyframe data spells a path as one string joined by a single
//! delimiter character (`_` unless configured otherwise):
//!   "position_x"       -> keys=["position", "x"]
//!   "material_color_r" -> keys=["material", "color", "r"]
//!   "opacity"          -> keys=["opacity"]
//!
//! Inner keys may be empty ("a__b" -> ["a", "", "b"]); only a fully empty
//! path is rejected. Serde and `Display` always use [`DEFAULT_DELIMITER`].

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Nesting delimiter used by keyframe property names.
pub const DEFAULT_DELIMITER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty property path")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    /// Ordered keys from the target root to the leaf (never empty)
    keys: Vec<String>,
}

impl PropertyPath {
    /// Construct a path from already split keys.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { keys })
    }

    /// Parse a path joined by [`DEFAULT_DELIMITER`].
    pub fn parse(s: &str) -> Result<Self, PathError> {
        Self::parse_with(s, DEFAULT_DELIMITER)
    }

    /// Parse a path joined by `delimiter`.
    pub fn parse_with(s: &str, delimiter: char) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self {
            keys: s.split(delimiter).map(str::to_string).collect(),
        })
    }

    /// Iterate over every key, root first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|s| s.as_str())
    }

    /// Keys of the containers that must exist before the leaf can be written.
    pub fn parents(&self) -> &[String] {
        &self.keys[..self.keys.len() - 1]
    }

    /// The final key, written with the interpolated value.
    pub fn leaf(&self) -> &str {
        &self.keys[self.keys.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: a path holds at least one key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True when the leaf lives below at least one container.
    pub fn is_nested(&self) -> bool {
        self.keys.len() > 1
    }

    /// Join the keys back together with `delimiter`.
    pub fn join(&self, delimiter: char) -> String {
        let mut buf = [0u8; 4];
        self.keys.join(delimiter.encode_utf8(&mut buf))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_DELIMITER))
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for PropertyPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D>(deserializer: D) -> Result<PropertyPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropertyPath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested() {
        let p = PropertyPath::parse("position_x").unwrap();
        assert_eq!(p.parents(), &["position".to_string()]);
        assert_eq!(p.leaf(), "x");
        assert!(p.is_nested());
        assert_eq!(p.to_string(), "position_x");
    }

    #[test]
    fn parse_flat() {
        let p = PropertyPath::parse("opacity").unwrap();
        assert!(p.parents().is_empty());
        assert_eq!(p.leaf(), "opacity");
        assert!(!p.is_nested());
    }

    #[test]
    fn parse_custom_delimiter() {
        let p = PropertyPath::parse_with("rotation.y", '.').unwrap();
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["rotation", "y"]);
        assert_eq!(p.join('.'), "rotation.y");
        assert_eq!(p.to_string(), "rotation_y");
    }

    #[test]
    fn empty_inner_keys_are_kept() {
        let p = PropertyPath::parse("a__b").unwrap();
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["a", "", "b"]);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(PropertyPath::parse(""), Err(PathError::Empty));
        assert_eq!(
            PropertyPath::from_keys(Vec::<String>::new()),
            Err(PathError::Empty)
        );
    }

    #[test]
    fn serde_as_string() {
        let p = PropertyPath::from_keys(["camera", "fov"]).unwrap();
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, "\"camera_fov\"");
        let back: PropertyPath = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
