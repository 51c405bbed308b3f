//! Chart.js binding.

use crate::features::dashboard::charts::ChartInstance;
use crate::services::js::{call_method, global, has_method, js_error, to_js};
use anyhow::anyhow;
use gloo::console;
use gloo::utils::document;
use js_sys::{Array, Function, Reflect};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

/// Live `Chart` instance.
pub(crate) struct JsChart {
    instance: JsValue,
}

impl JsChart {
    /// Whether `window.Chart` is loaded.
    pub(crate) fn available() -> bool {
        global("Chart").is_some_and(|chart| chart.is_function())
    }

    /// `new Chart(canvas, config)` on the canvas with `canvas_id`.
    pub(crate) fn create(canvas_id: &str, config: &Value) -> anyhow::Result<Self> {
        let constructor: Function = global("Chart")
            .ok_or_else(|| anyhow!("Chart.js not loaded"))?
            .dyn_into()
            .map_err(|_| anyhow!("Chart is not a constructor"))?;
        let canvas = document()
            .get_element_by_id(canvas_id)
            .ok_or_else(|| anyhow!("canvas {canvas_id} not found"))?;
        let args = Array::of2(&canvas, &to_js(config)?);
        let instance = Reflect::construct(&constructor, &args)
            .map_err(|err| js_error("new Chart", &err))?;
        Ok(Self { instance })
    }

    fn invoke(&self, method: &str) {
        if !has_method(&self.instance, method) {
            return;
        }
        if let Err(err) = call_method(&self.instance, method, &Array::new()) {
            console::warn!("chart call failed", err.to_string());
        }
    }
}

impl ChartInstance for JsChart {
    fn resize(&self) {
        self.invoke("resize");
    }

    fn destroy(&self) {
        self.invoke("destroy");
    }
}
