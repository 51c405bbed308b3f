//! GridStack binding.
//!
//! Grid items are rendered by Yew with `gs-id` set to the widget id; the
//! engine only positions them, and Yew removes the DOM nodes.

use crate::features::dashboard::layout::GridOptions;
use crate::services::js::{call_method, global, has_method, number_field, string_field, to_js};
use anyhow::anyhow;
use contratos_api_models::LayoutEntry;
use gloo::console;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen::closure::Closure;
use web_sys::Element;
use yew::Callback;

type Listener = Closure<dyn FnMut(JsValue, JsValue)>;

/// Attribute carrying the widget id on grid items.
pub(crate) const ID_ATTRIBUTE: &str = "gs-id";

/// Live GridStack instance; destroyed (keeping the DOM) on drop.
pub(crate) struct GridHandle {
    grid: JsValue,
    listeners: Vec<Listener>,
}

impl GridHandle {
    /// Capability check: `window.GridStack.init` is callable.
    pub(crate) fn available() -> bool {
        global("GridStack").is_some_and(|gridstack| has_method(&gridstack, "init"))
    }

    /// `GridStack.init(options, element)`.
    pub(crate) fn init(element: &Element, options: &GridOptions) -> anyhow::Result<Self> {
        let gridstack = global("GridStack").ok_or_else(|| anyhow!("GridStack not loaded"))?;
        let args = Array::of2(&to_js(&options.engine_options())?, element);
        let grid = call_method(&gridstack, "init", &args)?;
        if grid.is_undefined() || grid.is_null() {
            return Err(anyhow!("GridStack.init returned nothing"));
        }
        Ok(Self {
            grid,
            listeners: Vec::new(),
        })
    }

    fn listen(&mut self, events: &str, handler: impl FnMut(JsValue, JsValue) + 'static) {
        let listener = Closure::<dyn FnMut(JsValue, JsValue)>::wrap(
            Box::new(handler) as Box<dyn FnMut(JsValue, JsValue)>
        );
        let args = Array::of2(&JsValue::from_str(events), listener.as_ref());
        match call_method(&self.grid, "on", &args) {
            Ok(_) => self.listeners.push(listener),
            Err(err) => console::error!("grid listener failed", events, err.to_string()),
        }
    }

    /// Forward `change` events as layout entries.
    pub(crate) fn on_change(&mut self, callback: Callback<Vec<LayoutEntry>>) {
        self.listen("change", move |_event, items| {
            callback.emit(entries_from(&items));
        });
    }

    /// Forward the widget id of `dragstop` and `resizestop` events.
    pub(crate) fn on_settled(&mut self, callback: Callback<String>) {
        self.listen("dragstop resizestop", move |_event, element| {
            if let Some(id) = element
                .dyn_ref::<Element>()
                .and_then(|element| element.get_attribute(ID_ATTRIBUTE))
            {
                callback.emit(id);
            }
        });
    }

    /// Enable or disable drag and resize.
    pub(crate) fn set_editable(&self, editable: bool) {
        let method = if editable { "enable" } else { "disable" };
        self.call(method, &Array::new());
    }

    /// Adopt a rendered grid item.
    pub(crate) fn make_widget(&self, element: &Element) {
        self.call("makeWidget", &Array::of1(element));
    }

    /// Release a grid item without touching its DOM.
    pub(crate) fn remove_widget(&self, element: &Element) {
        self.call("removeWidget", &Array::of2(element, &JsValue::FALSE));
    }

    fn call(&self, method: &str, args: &Array) {
        if let Err(err) = call_method(&self.grid, method, args) {
            console::error!("grid call failed", method, err.to_string());
        }
    }
}

impl Drop for GridHandle {
    fn drop(&mut self) {
        if let Err(err) = call_method(&self.grid, "destroy", &Array::of1(&JsValue::FALSE)) {
            console::warn!("grid destroy failed", err.to_string());
        }
    }
}

/// Layout entries from a `change` event's node list.
fn entries_from(items: &JsValue) -> Vec<LayoutEntry> {
    if !Array::is_array(items) {
        return Vec::new();
    }
    Array::from(items)
        .iter()
        .filter_map(|node| {
            let id = string_field(&node, "id")?;
            let field = |name| to_cell_unit(number_field(&node, name));
            Some(LayoutEntry {
                id,
                x: field("x"),
                y: field("y"),
                w: field("w").max(1),
                h: field("h").max(1),
            })
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_cell_unit(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}
