use js_sys::Function;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use keyline_api_core::{IntermediatePolicy, PropertyBag, PropertyPath, PropertyTarget};
use keyline_timeline_core::{
    parse_keyframes_json, KeyframeMap, Timeline, TimelineBuilder, TimelineConfig, TimelineError,
};

/// Constructor options: the core `TimelineConfig` fields plus the policy used
/// when writing into the target object.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WasmConfig {
    #[serde(flatten)]
    timeline: TimelineConfig,
    intermediate_policy: IntermediatePolicy,
}

#[wasm_bindgen]
pub struct KeylineTimeline {
    core: Timeline<PropertyBag>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn timeline_error(err: TimelineError) -> JsError {
    JsError::new(&format!("{}: {err}", err.code()))
}

/// Plain JS objects rather than `Map`s for JSON maps.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("serialize error: {e}")))
}

/// Forwards writes to a JS callback `setter(path: string, value: number)`.
/// The first exception thrown by the callback is kept and reported.
struct JsSetter {
    f: Function,
    error: Option<JsValue>,
}

impl PropertyTarget for JsSetter {
    fn write(&mut self, path: &PropertyPath, value: f64) {
        if self.error.is_some() {
            return;
        }
        let arg_path = JsValue::from_str(&path.to_string());
        let arg_value = JsValue::from_f64(value);
        if let Err(e) = self.f.call2(&JsValue::UNDEFINED, &arg_path, &arg_value) {
            self.error = Some(e);
        }
    }
}

#[wasm_bindgen]
impl KeylineTimeline {
    /// Create a timeline over a copy of `target`.
    /// Example:
    ///   new KeylineTimeline({}, { 0: { position_x: 0 }, 100: { position_x: 1 } })
    ///   new KeylineTimeline(obj, frames, { key_order: "as_provided" })
    /// Missing inputs throw with a reason code prefix (`missing_target: ...`).
    #[wasm_bindgen(constructor)]
    pub fn new(
        target: JsValue,
        keyframes: JsValue,
        config: JsValue,
    ) -> Result<KeylineTimeline, JsError> {
        console_error_panic_hook::set_once();

        let cfg: WasmConfig = if jsvalue_is_undefined_or_null(&config) {
            WasmConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let mut builder = TimelineBuilder::new().config(cfg.timeline);
        if !jsvalue_is_undefined_or_null(&target) {
            let root: serde_json::Value = swb::from_value(target)
                .map_err(|e| JsError::new(&format!("target parse error: {e}")))?;
            builder =
                builder.target(PropertyBag::from_json(root).with_policy(cfg.intermediate_policy));
        }
        if !jsvalue_is_undefined_or_null(&keyframes) {
            let map: KeyframeMap = swb::from_value(keyframes)
                .map_err(|e| JsError::new(&format!("keyframes parse error: {e}")))?;
            builder = builder.keyframes(map);
        }

        let core = builder.build().map_err(timeline_error)?;
        Ok(KeylineTimeline { core })
    }

    /// Set progress and return the updated target object.
    #[wasm_bindgen(js_name = set_progress)]
    pub fn set_progress(&mut self, value: f64) -> Result<JsValue, JsError> {
        self.core.set_progress(value);
        self.target()
    }

    /// Re-apply the stored progress and return the target object.
    #[wasm_bindgen]
    pub fn update(&mut self) -> Result<JsValue, JsError> {
        self.core.update();
        self.target()
    }

    #[wasm_bindgen]
    pub fn progress(&self) -> f64 {
        self.core.progress()
    }

    /// Current target object (a copy).
    #[wasm_bindgen]
    pub fn target(&self) -> Result<JsValue, JsError> {
        match self.core.target() {
            Some(bag) => to_js(bag.as_json()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Compiled segments: `[{ property, percentMin, percentMax, valueMin, valueMax }]`.
    #[wasm_bindgen]
    pub fn segments(&self) -> Result<JsValue, JsError> {
        to_js(self.core.segments())
    }

    /// Writes an update at `progress` would perform: `[{ path, value }]`.
    #[wasm_bindgen]
    pub fn sample(&self, progress: f64) -> Result<JsValue, JsError> {
        to_js(&self.core.sample(progress))
    }

    /// Push the writes for `progress` into a JS callback instead of the
    /// internal copy: `setter(path: string, value: number)`.
    #[wasm_bindgen(js_name = apply_to)]
    pub fn apply_to(&self, progress: f64, setter: Function) -> Result<(), JsValue> {
        let mut js_setter = JsSetter {
            f: setter,
            error: None,
        };
        self.core.sample(progress).apply_to(&mut js_setter);
        match js_setter.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Check a keyframes JSON document without building a timeline.
#[wasm_bindgen]
pub fn validate_keyframes_json(keyframes_json: &str) -> Result<(), JsValue> {
    let map = parse_keyframes_json(keyframes_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    keyline_timeline_core::compile(&map, &TimelineConfig::default())
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&format!("{}: {e}", e.code())))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
