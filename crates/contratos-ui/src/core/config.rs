//! Page-level configuration for each mounted feature.
//!
//! # Design
//! - Every field has a default so a partially rendered template still mounts.
//! - Chat keys keep the legacy camelCase names used by the server templates.
//! - URL templates use the `__ID__` placeholder, filled URL-encoded.

use crate::features::chat::features::{ChatFeatures, ChatVariant};
use serde::Deserialize;

/// Placeholder replaced by a session id in chat URL templates.
pub const ID_PLACEHOLDER: &str = "__ID__";

/// Default base path of the widget data endpoint.
pub const DEFAULT_WIDGET_DATA_BASE: &str = "/relatorios/api/widget-data";

/// Replace [`ID_PLACEHOLDER`] in `template` with the URL-encoded `id`.
#[must_use]
pub fn fill_template(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, &urlencoding::encode(id))
}

/// Session entry rendered in the chat sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SessionLink {
    /// Opaque session id.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
}

/// Chat panel configuration (the page's `CHAT_CONFIG` object).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConfig {
    /// Send-message endpoint.
    #[serde(default)]
    pub send_url: Option<String>,
    /// New-session endpoint.
    #[serde(default)]
    pub new_session_url: Option<String>,
    /// Message-list endpoint template.
    #[serde(default)]
    pub get_messages_base_url: Option<String>,
    /// Delete-session endpoint template.
    #[serde(default)]
    pub delete_session_base_url: Option<String>,
    /// Optional messages-per-day statistics endpoint.
    #[serde(default)]
    pub stats_url: Option<String>,
    /// Active session id as rendered by the server.
    #[serde(default, alias = "currentSessionId")]
    pub session_id: Option<String>,
    /// Feature preset.
    #[serde(default)]
    pub variant: ChatVariant,
    /// Sessions listed in the sidebar.
    #[serde(default)]
    pub sessions: Vec<SessionLink>,
}

impl ChatConfig {
    /// Features enabled by the configured variant.
    #[must_use]
    pub const fn features(&self) -> ChatFeatures {
        ChatFeatures::for_variant(self.variant)
    }

    /// Message-list URL for `session_id`, when configured.
    #[must_use]
    pub fn messages_url(&self, session_id: &str) -> Option<String> {
        self.get_messages_base_url
            .as_deref()
            .map(|template| fill_template(template, session_id))
    }

    /// Delete URL for `session_id`, when configured.
    #[must_use]
    pub fn delete_url(&self, session_id: &str) -> Option<String> {
        self.delete_session_base_url
            .as_deref()
            .map(|template| fill_template(template, session_id))
    }
}

/// Dashboard configuration (mount element `data-*` attributes).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Base path of the per-widget data endpoint.
    #[serde(default = "default_widget_base")]
    pub widget_data_base: String,
    /// Grid column count.
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Row height in pixels.
    #[serde(default = "default_cell_height")]
    pub cell_height: u32,
    /// Gap between cells in pixels.
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            widget_data_base: default_widget_base(),
            columns: default_columns(),
            cell_height: default_cell_height(),
            margin: default_margin(),
        }
    }
}

impl DashboardConfig {
    /// Data URL for one widget.
    #[must_use]
    pub fn widget_url(&self, widget_id: &str) -> String {
        format!(
            "{}/{}",
            self.widget_data_base.trim_end_matches('/'),
            urlencoding::encode(widget_id)
        )
    }
}

fn default_widget_base() -> String {
    DEFAULT_WIDGET_DATA_BASE.to_string()
}

const fn default_columns() -> u32 {
    12
}

const fn default_cell_height() -> u32 {
    80
}

const fn default_margin() -> u32 {
    10
}

/// Aditivos modal configuration derived from the hosting page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AditivosConfig {
    /// Reload the whole page after a successful create or delete.
    pub reload_on_change: bool,
}

impl AditivosConfig {
    /// Contract detail pages embed the amendment list in server markup, so
    /// they need a full reload after each change.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        Self {
            reload_on_change: path.contains("/detalhes/"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_config_reads_legacy_keys() {
        let config: ChatConfig = serde_json::from_value(json!({
            "sendUrl": "/chat/send",
            "getMessagesBaseUrl": "/chat/__ID__/messages",
            "deleteSessionBaseUrl": "/chat/__ID__/delete",
            "currentSessionId": "a b",
            "variant": "insights"
        }))
        .expect("decode");
        assert_eq!(config.send_url.as_deref(), Some("/chat/send"));
        assert_eq!(config.session_id.as_deref(), Some("a b"));
        assert_eq!(config.variant, ChatVariant::Insights);
        assert_eq!(
            config.messages_url("a b").as_deref(),
            Some("/chat/a%20b/messages")
        );
        assert_eq!(config.delete_url("x").as_deref(), Some("/chat/x/delete"));
    }

    #[test]
    fn empty_chat_config_defaults_to_full_variant() {
        let config: ChatConfig = serde_json::from_value(json!({})).expect("decode");
        assert_eq!(config.variant, ChatVariant::Full);
        assert!(config.messages_url("x").is_none());
        assert!(config.sessions.is_empty());
    }

    #[test]
    fn dashboard_defaults_match_grid_options() {
        let config: DashboardConfig = serde_json::from_value(json!({})).expect("decode");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.columns, 12);
        assert_eq!(config.cell_height, 80);
        assert_eq!(config.margin, 10);
        assert_eq!(
            config.widget_url("kpi-empenhos"),
            "/relatorios/api/widget-data/kpi-empenhos"
        );
    }

    #[test]
    fn only_detail_pages_reload() {
        assert!(AditivosConfig::for_path("/contratos/detalhes/12").reload_on_change);
        assert!(!AditivosConfig::for_path("/contratos/").reload_on_change);
    }
}
