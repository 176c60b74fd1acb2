//! Keyframe compiler: sparse keyframes -> ordered per-property segments.
//!
//! Model:
//! - Keyframes are ordered per [`KeyOrder`] and their percents parsed.
//! - A running table carries every property's last declared value forward,
//!   in first-appearance order.
//! - Each keyframe emits one segment per property in the table, spanning to
//!   the next keyframe (or `final_percent` for the last one). The end value is
//!   the next keyframe's declaration of the property, else the carried value.
//! - With [`KeyOrder::Ascending`], empty or inverted windows emit nothing, so
//!   a keyframe sitting at `final_percent` contributes no segments.
//! - With [`KeyOrder::AsProvided`] every window is kept, inverted ones
//!   included. An inverted window writes its end value at any progress past
//!   its upper bound.

use hashbrown::{HashMap, HashSet};
use keyline_api_core::PropertyPath;

use crate::config::{KeyOrder, TimelineConfig};
use crate::error::TimelineError;
use crate::keyframes::{parse_percent, KeyframeMap};
use crate::segment::Segment;

/// One keyframe with its percent parsed and property names resolved to paths.
struct ResolvedFrame {
    percent: i32,
    values: Vec<(PropertyPath, f64)>,
    index: HashMap<PropertyPath, usize>,
}

impl ResolvedFrame {
    fn get(&self, path: &PropertyPath) -> Option<f64> {
        self.index.get(path).map(|&i| self.values[i].1)
    }
}

/// Last declared value per property, in first-appearance order.
#[derive(Default)]
struct CarryTable {
    entries: Vec<(PropertyPath, f64)>,
    index: HashMap<PropertyPath, usize>,
}

impl CarryTable {
    fn set(&mut self, path: &PropertyPath, value: f64) {
        match self.index.get(path) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path.clone(), value));
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&PropertyPath, f64)> {
        self.entries.iter().map(|(path, value)| (path, *value))
    }
}

fn resolve_frames(
    keyframes: &KeyframeMap,
    config: &TimelineConfig,
) -> Result<Vec<ResolvedFrame>, TimelineError> {
    let mut seen = HashSet::with_capacity(keyframes.len());
    let mut frames = Vec::with_capacity(keyframes.len());
    for frame in keyframes.iter() {
        let percent = parse_percent(frame.key())?;
        if !seen.insert(percent) {
            return Err(TimelineError::DuplicatePercent { percent });
        }
        let mut values = Vec::with_capacity(frame.len());
        let mut index = HashMap::with_capacity(frame.len());
        for (name, value) in frame.properties() {
            let path = PropertyPath::parse_with(name, config.path_delimiter).map_err(|source| {
                TimelineError::InvalidPath {
                    key: frame.key().to_string(),
                    path: name.to_string(),
                    source,
                }
            })?;
            index.insert(path.clone(), values.len());
            values.push((path, value));
        }
        frames.push(ResolvedFrame {
            percent,
            values,
            index,
        });
    }
    if config.key_order == KeyOrder::Ascending {
        frames.sort_by_key(|f| f.percent);
    }
    Ok(frames)
}

/// Build the segment list for `keyframes`.
pub fn compile(
    keyframes: &KeyframeMap,
    config: &TimelineConfig,
) -> Result<Vec<Segment>, TimelineError> {
    if keyframes.is_empty() {
        return Err(TimelineError::EmptyKeyframes);
    }
    let frames = resolve_frames(keyframes, config)?;

    let keep_empty_windows = config.key_order == KeyOrder::AsProvided;
    let mut table = CarryTable::default();
    let mut segments = Vec::new();
    for (i, frame) in frames.iter().enumerate() {
        for (path, value) in &frame.values {
            table.set(path, *value);
        }

        // The last window ends at `final_percent` and takes its end values
        // from the keyframe declared there, wherever it sits in the input.
        let next = frames
            .get(i + 1)
            .or_else(|| frames.iter().find(|f| f.percent == config.final_percent));
        let percent_max = frames
            .get(i + 1)
            .map_or(config.final_percent, |n| n.percent);
        if frame.percent >= percent_max && !keep_empty_windows {
            log::trace!(
                "keyframe {} has an empty window up to {}; no segments",
                frame.percent,
                percent_max
            );
            continue;
        }

        for (path, value_min) in table.iter() {
            let value_max = next.and_then(|n| n.get(path)).unwrap_or(value_min);
            segments.push(Segment {
                property: path.clone(),
                percent_min: frame.percent,
                percent_max,
                value_min,
                value_max,
            });
        }
    }

    log::debug!(
        "compiled {} keyframes ({} properties) into {} segments",
        frames.len(),
        table.entries.len(),
        segments.len()
    );
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> PropertyPath {
        PropertyPath::parse(s).unwrap()
    }

    fn carry_forward_map() -> KeyframeMap {
        KeyframeMap::new()
            .with("0", [("x", 0.0), ("y", 0.0)])
            .with("50", [("x", 5.0)])
            .with("100", [("x", 10.0), ("y", 10.0)])
    }

    fn summary(segments: &[Segment]) -> Vec<(String, i32, i32, f64, f64)> {
        segments
            .iter()
            .map(|s| {
                (
                    s.property.to_string(),
                    s.percent_min,
                    s.percent_max,
                    s.value_min,
                    s.value_max,
                )
            })
            .collect()
    }

    #[test]
    fn carry_forward_segments() {
        let segs = compile(&carry_forward_map(), &TimelineConfig::default()).unwrap();
        assert_eq!(
            summary(&segs),
            vec![
                ("x".to_string(), 0, 50, 0.0, 5.0),
                ("y".to_string(), 0, 50, 0.0, 0.0),
                ("x".to_string(), 50, 100, 5.0, 10.0),
                ("y".to_string(), 50, 100, 0.0, 10.0),
            ]
        );
    }

    #[test]
    fn last_keyframe_below_final_spans_to_final() {
        let map = KeyframeMap::new()
            .with("0", [("x", 0.0)])
            .with("40", [("x", 4.0), ("z", 1.0)]);
        let segs = compile(&map, &TimelineConfig::default()).unwrap();
        assert_eq!(
            summary(&segs),
            vec![
                ("x".to_string(), 0, 40, 0.0, 4.0),
                ("x".to_string(), 40, 100, 4.0, 4.0),
                ("z".to_string(), 40, 100, 1.0, 1.0),
            ]
        );
    }

    #[test]
    fn property_only_in_final_keyframe_has_no_segments() {
        let map = KeyframeMap::new()
            .with("0", Vec::<(String, f64)>::new())
            .with("100", [("z", 5.0)]);
        let segs = compile(&map, &TimelineConfig::default()).unwrap();
        assert!(segs.is_empty());
    }

    #[test]
    fn ascending_sorts_out_of_order_keys() {
        let shuffled = KeyframeMap::new()
            .with("100", [("x", 10.0), ("y", 10.0)])
            .with("0", [("x", 0.0), ("y", 0.0)])
            .with("50", [("x", 5.0)]);
        let sorted = compile(&carry_forward_map(), &TimelineConfig::default()).unwrap();
        let from_shuffled = compile(&shuffled, &TimelineConfig::default()).unwrap();
        // Property first-appearance order follows the sorted frames too.
        assert_eq!(summary(&sorted), summary(&from_shuffled));
    }

    #[test]
    fn as_provided_keeps_supplied_order() {
        let shuffled = KeyframeMap::new()
            .with("50", [("x", 5.0)])
            .with("0", [("x", 0.0)])
            .with("100", [("x", 10.0)]);
        let cfg = TimelineConfig {
            key_order: KeyOrder::AsProvided,
            ..TimelineConfig::default()
        };
        let segs = compile(&shuffled, &cfg).unwrap();
        assert_eq!(
            summary(&segs),
            vec![
                ("x".to_string(), 50, 0, 5.0, 0.0),
                ("x".to_string(), 0, 100, 0.0, 10.0),
                ("x".to_string(), 100, 100, 10.0, 10.0),
            ]
        );
    }

    #[test]
    fn as_provided_last_window_reads_final_keyframe() {
        let shuffled = KeyframeMap::new()
            .with("100", [("x", 10.0)])
            .with("0", [("x", 0.0)])
            .with("50", [("x", 5.0)]);
        let cfg = TimelineConfig {
            key_order: KeyOrder::AsProvided,
            ..TimelineConfig::default()
        };
        let segs = compile(&shuffled, &cfg).unwrap();
        assert_eq!(
            summary(&segs),
            vec![
                ("x".to_string(), 100, 0, 10.0, 0.0),
                ("x".to_string(), 0, 50, 0.0, 5.0),
                ("x".to_string(), 50, 100, 5.0, 10.0),
            ]
        );
    }

    #[test]
    fn as_provided_writes_final_only_property_at_end() {
        let map = KeyframeMap::new()
            .with("0", Vec::<(String, f64)>::new())
            .with("100", [("z", 5.0)]);
        let cfg = TimelineConfig {
            key_order: KeyOrder::AsProvided,
            ..TimelineConfig::default()
        };
        let segs = compile(&map, &cfg).unwrap();
        assert_eq!(summary(&segs), vec![("z".to_string(), 100, 100, 5.0, 5.0)]);
    }

    #[test]
    fn zero_values_carry_forward() {
        let map = KeyframeMap::new()
            .with("0", [("opacity", 0.0)])
            .with("50", [("scale", 2.0)])
            .with("100", [("opacity", 1.0), ("scale", 4.0)]);
        let segs = compile(&map, &TimelineConfig::default()).unwrap();
        let opacity: Vec<_> = segs.iter().filter(|s| s.property == path("opacity")).collect();
        assert_eq!(opacity.len(), 2);
        assert_eq!((opacity[0].value_min, opacity[0].value_max), (0.0, 0.0));
        assert_eq!((opacity[1].value_min, opacity[1].value_max), (0.0, 1.0));
    }

    #[test]
    fn nested_paths_use_configured_delimiter() {
        let map = KeyframeMap::new()
            .with("0", [("rotation.y", 0.0)])
            .with("100", [("rotation.y", 3.0)]);
        let cfg = TimelineConfig {
            path_delimiter: '.',
            ..TimelineConfig::default()
        };
        let segs = compile(&map, &cfg).unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].property.parents(), &["rotation".to_string()]);
        assert_eq!(segs[0].property.leaf(), "y");
    }

    #[test]
    fn final_percent_is_configurable() {
        let map = KeyframeMap::new().with("0", [("x", 1.0)]);
        let cfg = TimelineConfig {
            final_percent: 1000,
            ..TimelineConfig::default()
        };
        let segs = compile(&map, &cfg).unwrap();
        assert_eq!(summary(&segs), vec![("x".to_string(), 0, 1000, 1.0, 1.0)]);
    }

    #[test]
    fn errors_carry_reason_codes() {
        let cfg = TimelineConfig::default();
        assert_eq!(
            compile(&KeyframeMap::new(), &cfg),
            Err(TimelineError::EmptyKeyframes)
        );

        let bad_key = KeyframeMap::new().with("start", [("x", 0.0)]);
        assert_eq!(compile(&bad_key, &cfg).unwrap_err().code(), "invalid_percent");

        let dup = KeyframeMap::new()
            .with("50", [("x", 0.0)])
            .with("50%", [("x", 1.0)]);
        assert_eq!(
            compile(&dup, &cfg),
            Err(TimelineError::DuplicatePercent { percent: 50 })
        );

        let empty_path = KeyframeMap::new().with("0", [("", 0.0)]);
        assert_eq!(compile(&empty_path, &cfg).unwrap_err().code(), "invalid_path");
    }
}
