//! Boot: mount each feature on the page elements that ask for it and expose
//! the entry points legacy page scripts call.
//!
//! # Design
//! - Every feature mounts independently; a page without a mount point simply
//!   skips that feature.
//! - Page scripts talk to mounted components through yewdux stores, never
//!   through component internals.

use crate::components::toast::ToastHost;
use crate::core::config::{ChatConfig, DashboardConfig};
use crate::features::aditivos::view::{AditivosModal, request_open};
use crate::features::chat::view::{ChatPanel, ChatPanelProps};
use crate::features::dashboard::view::{Dashboard, DashboardProps, request_refresh};
use crate::services::js::{from_js, global, set_global};
use gloo::console;
use gloo::utils::{body, document};
use std::str::FromStr;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::Element;

const ADITIVOS_ROOT: &str = "aditivos-root";
const CHAT_ROOT: &str = "chat-root";
const DASHBOARD_ROOT: &str = "dashboard-root";
const TOAST_ROOT: &str = "toast-root";

/// Open the aditivos modal for a contract.
pub fn open_aditivos_modal(contrato_id: String, numero_contrato: String) {
    request_open(contrato_id, numero_contrato);
}

/// Entrypoint invoked by Trunk for wasm32 builds.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = mount_point(TOAST_ROOT, true) {
        yew::Renderer::<ToastHost>::with_root(root).render();
    }
    if let Some(root) = mount_point(ADITIVOS_ROOT, true) {
        yew::Renderer::<AditivosModal>::with_root(root).render();
    }
    if let Some(root) = mount_point(CHAT_ROOT, false) {
        let props = ChatPanelProps {
            config: chat_config(),
        };
        yew::Renderer::<ChatPanel>::with_root_and_props(root, props).render();
    }
    if let Some(root) = mount_point(DASHBOARD_ROOT, false) {
        let props = DashboardProps {
            config: dashboard_config(&root),
        };
        yew::Renderer::<Dashboard>::with_root_and_props(root, props).render();
    }
    install_exports();
}

fn mount_point(id: &str, create: bool) -> Option<Element> {
    let document = document();
    if let Some(element) = document.get_element_by_id(id) {
        return Some(element);
    }
    if !create {
        return None;
    }
    let element = document.create_element("div").ok()?;
    element.set_id(id);
    if let Err(err) = body().append_child(&element) {
        console::error!("failed to create mount point", id, err);
        return None;
    }
    Some(element)
}

fn chat_config() -> ChatConfig {
    let Some(raw) = global("CHAT_CONFIG") else {
        console::warn!("CHAT_CONFIG não definido; usando configuração padrão");
        return ChatConfig::default();
    };
    from_js(&raw).unwrap_or_else(|err| {
        console::error!("CHAT_CONFIG inválido:", err.to_string());
        ChatConfig::default()
    })
}

fn numeric_attribute<T: FromStr>(root: &Element, name: &str, fallback: T) -> T {
    match root.get_attribute(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            console::warn!("atributo inválido ignorado", name, raw.as_str());
            fallback
        }),
        None => fallback,
    }
}

fn dashboard_config(root: &Element) -> DashboardConfig {
    let defaults = DashboardConfig::default();
    DashboardConfig {
        widget_data_base: root
            .get_attribute("data-widget-data-base")
            .filter(|base| !base.trim().is_empty())
            .unwrap_or(defaults.widget_data_base),
        columns: numeric_attribute(root, "data-columns", defaults.columns),
        cell_height: numeric_attribute(root, "data-cell-height", defaults.cell_height),
        margin: numeric_attribute(root, "data-margin", defaults.margin),
    }
}

/// Text of a script argument; numbers are accepted for ids.
fn js_text(value: &JsValue) -> Option<String> {
    value
        .as_string()
        .or_else(|| value.as_f64().map(|number| number.to_string()))
}

fn export(name: &str, value: &JsValue) {
    if let Err(err) = set_global(name, value) {
        console::error!("failed to install global", name, err.to_string());
    }
}

fn install_exports() {
    let open = Closure::<dyn Fn(JsValue, JsValue)>::wrap(Box::new(
        |contrato_id: JsValue, numero_contrato: JsValue| {
            let Some(contrato_id) = js_text(&contrato_id) else {
                console::warn!("abrirModalAditivos chamado sem contratoId");
                return;
            };
            open_aditivos_modal(contrato_id, js_text(&numero_contrato).unwrap_or_default());
        },
    ) as Box<dyn Fn(JsValue, JsValue)>);
    export("abrirModalAditivos", &open.into_js_value());

    let update = Closure::<dyn Fn(JsValue)>::wrap(Box::new(|widget_id: JsValue| {
        match js_text(&widget_id) {
            Some(widget_id) => request_refresh(Some(widget_id)),
            None => console::warn!("updateWidgetData chamado sem widgetId"),
        }
    }) as Box<dyn Fn(JsValue)>);
    export("updateWidgetData", &update.into_js_value());

    let refresh_all =
        Closure::<dyn Fn()>::wrap(Box::new(|| request_refresh(None)) as Box<dyn Fn()>);
    export("refreshAllWidgets", &refresh_all.into_js_value());
}
