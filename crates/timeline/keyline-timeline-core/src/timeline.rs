//! Timeline: compiled keyframes bound to a target, driven by progress.
//!
//! Methods:
//! - new / with_config / TimelineBuilder (validate + compile once)
//! - set_progress (store + re-evaluate every segment), update, sample
//! - segments / progress / target accessors

use keyline_api_core::{PropertyTarget, WriteBatch};

use crate::compiler::compile;
use crate::config::TimelineConfig;
use crate::error::TimelineError;
use crate::evaluator::{evaluate, sample};
use crate::keyframes::KeyframeMap;
use crate::segment::Segment;

/// A keyframe timeline writing into a target of type `T`.
///
/// `T` may be owned (`serde_json::Value`, [`keyline_api_core::PropertyBag`]),
/// borrowed (`&mut T`) or shared (`Rc<RefCell<T>>`).
#[derive(Debug)]
pub struct Timeline<T> {
    target: Option<T>,
    keyframes: Option<KeyframeMap>,
    segments: Vec<Segment>,
    progress: f64,
    config: TimelineConfig,
}

impl<T: PropertyTarget> Timeline<T> {
    /// Compile `keyframes` with the default config.
    pub fn new(target: T, keyframes: KeyframeMap) -> Result<Self, TimelineError> {
        Self::with_config(target, keyframes, TimelineConfig::default())
    }

    pub fn with_config(
        target: T,
        keyframes: KeyframeMap,
        config: TimelineConfig,
    ) -> Result<Self, TimelineError> {
        let segments = compile(&keyframes, &config)?;
        Ok(Self {
            target: Some(target),
            keyframes: Some(keyframes),
            segments,
            progress: 0.0,
            config,
        })
    }

    /// A timeline that never writes. Produced by [`TimelineBuilder::build_or_inert`].
    fn inert(config: TimelineConfig) -> Self {
        Self {
            target: None,
            keyframes: None,
            segments: Vec::new(),
            progress: 0.0,
            config,
        }
    }

    /// False for inert timelines.
    pub fn is_initialized(&self) -> bool {
        self.target.is_some()
    }

    /// Store `value` and write every segment's value at it into the target.
    pub fn set_progress(&mut self, value: f64) {
        self.progress = value;
        self.update();
    }

    /// Re-apply the stored progress (e.g. after the target was reset externally).
    pub fn update(&mut self) {
        if let Some(target) = self.target.as_mut() {
            let writes = evaluate(&self.segments, self.progress, target);
            log::trace!("progress {} -> {} writes", self.progress, writes);
        }
    }

    /// Evaluate at `progress` without touching the target or the stored progress.
    pub fn sample(&self, progress: f64) -> WriteBatch {
        sample(&self.segments, progress)
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn keyframes(&self) -> Option<&KeyframeMap> {
        self.keyframes.as_ref()
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }

    pub fn into_target(self) -> Option<T> {
        self.target
    }
}

/// Collects construction inputs so a missing one can be reported by reason.
#[derive(Debug)]
pub struct TimelineBuilder<T> {
    target: Option<T>,
    keyframes: Option<KeyframeMap>,
    config: TimelineConfig,
}

impl<T> Default for TimelineBuilder<T> {
    fn default() -> Self {
        Self {
            target: None,
            keyframes: None,
            config: TimelineConfig::default(),
        }
    }
}

impl<T: PropertyTarget> TimelineBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: T) -> Self {
        self.target = Some(target);
        self
    }

    pub fn keyframes(mut self, keyframes: KeyframeMap) -> Self {
        self.keyframes = Some(keyframes);
        self
    }

    pub fn config(mut self, config: TimelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Timeline<T>, TimelineError> {
        let target = self.target.ok_or(TimelineError::MissingTarget)?;
        let keyframes = self.keyframes.ok_or(TimelineError::MissingKeyframes)?;
        Timeline::with_config(target, keyframes, self.config)
    }

    /// Like [`build`](Self::build), but a failure is logged and yields an
    /// inert timeline whose `set_progress` only records the value.
    pub fn build_or_inert(self) -> Timeline<T> {
        let config = self.config.clone();
        match self.build() {
            Ok(timeline) => timeline,
            Err(err) => {
                log::warn!("timeline initialization failed [{}]: {err}", err.code());
                Timeline::inert(config)
            }
        }
    }
}
