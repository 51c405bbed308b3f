//! `Reflect` helpers for page globals and untyped JS objects.

use anyhow::{Context, anyhow};
use js_sys::{Array, Function, JSON, Reflect};
use serde::de::DeserializeOwned;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

pub(crate) fn js_error(context: &str, err: &JsValue) -> anyhow::Error {
    anyhow!("{context}: {err:?}")
}

/// Property of `window`, when defined.
pub(crate) fn global(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// Whether `target[name]` is a function.
pub(crate) fn has_method(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name)).is_ok_and(|value| value.is_function())
}

/// Call `target[name](...args)`.
pub(crate) fn call_method(target: &JsValue, name: &str, args: &Array) -> anyhow::Result<JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|err| js_error(name, &err))?
        .dyn_into()
        .map_err(|_| anyhow!("{name} is not a function"))?;
    method
        .apply(target, args)
        .map_err(|err| js_error(name, &err))
}

/// Install `value` as `window[name]`.
pub(crate) fn set_global(name: &str, value: &JsValue) -> anyhow::Result<()> {
    Reflect::set(&js_sys::global(), &JsValue::from_str(name), value)
        .map_err(|err| js_error(name, &err))?;
    Ok(())
}

pub(crate) fn to_js(value: &Value) -> anyhow::Result<JsValue> {
    let encoded = serde_json::to_string(value).context("encode options")?;
    JSON::parse(&encoded).map_err(|err| js_error("JSON.parse", &err))
}

/// Decode a plain JS object through `JSON.stringify`.
pub(crate) fn from_js<T: DeserializeOwned>(value: &JsValue) -> anyhow::Result<T> {
    let encoded: String = JSON::stringify(value)
        .map_err(|err| js_error("JSON.stringify", &err))?
        .into();
    serde_json::from_str(&encoded).context("decode page object")
}

/// Numeric property, 0 when absent.
pub(crate) fn number_field(target: &JsValue, name: &str) -> f64 {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_default()
}

/// String property, when present.
pub(crate) fn string_field(target: &JsValue, name: &str) -> Option<String> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_string())
}
