#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared DTOs for the Contratos web UI.
//!
//! Every payload exchanged with the backend (aditivos, chat sessions, dashboard
//! widget data) and every blob persisted in browser local storage lives here so
//! the front-end and its tests decode the same shapes. The backend is loosely
//! typed: numbers sometimes arrive as strings and optional collections are
//! frequently omitted, so decoding is lenient throughout.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

mod lenient;

pub use lenient::{lenient_f64, lenient_opt_f64, lenient_opt_u32, lenient_u32};

/// Fallback copy used when the backend reports failure without a message.
pub const UNKNOWN_ERROR: &str = "Erro desconhecido";

/// Generic `{success, error?}` envelope returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiOutcome {
    /// Whether the backend applied the change.
    #[serde(default)]
    pub success: bool,
    /// Optional failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiOutcome {
    /// Failure description, falling back to [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn error_message(&self) -> &str {
        error_or_unknown(self.error.as_deref())
    }
}

fn error_or_unknown(error: Option<&str>) -> &str {
    error
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(UNKNOWN_ERROR)
}

// ---------------------------------------------------------------------------
// Aditivos
// ---------------------------------------------------------------------------

/// Contract amendment record as listed by `GET /contratos/{id}/aditivos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aditivo {
    /// Backend identifier used for deletion.
    pub id: i64,
    /// Sequential amendment number within the contract.
    #[serde(deserialize_with = "lenient_u32")]
    pub numero_aditivo: u32,
    /// Amendment type (prazo, valor, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub tipo: String,
    /// ISO date (`YYYY-MM-DD`, optionally with a time part).
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_aditivo: String,
    /// Financial value, when the amendment changes the contract value.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub valor_financeiro: Option<f64>,
    /// Term extension in days, when the amendment changes the deadline.
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub prazo_dias: Option<u32>,
    /// Free-text justification.
    #[serde(default, deserialize_with = "null_as_default")]
    pub justificativa: String,
}

/// Response body of the aditivo listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AditivosResponse {
    /// Amendments registered for the contract; missing means none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub aditivos: Vec<Aditivo>,
}

/// Validated payload for `POST /contratos/aditivos/criar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovoAditivo {
    /// Owning contract identifier.
    pub contrato_id: String,
    /// Amendment number.
    pub numero_aditivo: u32,
    /// Amendment type.
    pub tipo: String,
    /// Amendment date as entered (`YYYY-MM-DD`).
    pub data_aditivo: String,
    /// Optional financial value, passed through as typed.
    pub valor_financeiro: Option<String>,
    /// Optional term extension in days, passed through as typed.
    pub prazo_dias: Option<String>,
    /// Justification text.
    pub justificativa: String,
}

impl NovoAditivo {
    /// Field pairs in the order the legacy form submitted them.
    #[must_use]
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("contrato_id", self.contrato_id.clone()),
            ("numero_aditivo", self.numero_aditivo.to_string()),
            ("tipo", self.tipo.clone()),
            ("data_aditivo", self.data_aditivo.clone()),
        ];
        if let Some(valor) = &self.valor_financeiro {
            pairs.push(("valor_financeiro", valor.clone()));
        }
        if let Some(prazo) = &self.prazo_dias {
            pairs.push(("prazo_dias", prazo.clone()));
        }
        pairs.push(("justificativa", self.justificativa.clone()));
        pairs
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// One stored exchange returned by the message-list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Text the user sent.
    #[serde(default)]
    pub message: String,
    /// Assistant reply, absent while pending or on failure.
    #[serde(default)]
    pub response: Option<String>,
    /// Server timestamp, `YYYY-MM-DD HH:MM[:SS]`.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HistoryEntry {
    /// Time portion of the server timestamp (second space-separated field).
    #[must_use]
    pub fn time_label(&self) -> Option<&str> {
        self.timestamp.as_deref()?.split(' ').nth(1)
    }
}

/// Response body of the message-list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryResponse {
    /// Whether the session could be read.
    #[serde(default)]
    pub success: bool,
    /// Stored exchanges in chronological order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<HistoryEntry>,
}

/// JSON body of the send-message endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    /// User text.
    pub message: String,
    /// Target session.
    pub session_id: String,
}

/// Assistant reply carried by [`SendMessageResponse`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantReply {
    /// Reply text (light markdown).
    #[serde(default)]
    pub ai_response: String,
    /// Display timestamp chosen by the server.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response body of the send-message endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageResponse {
    /// Whether the assistant produced a reply.
    #[serde(default)]
    pub success: bool,
    /// Reply payload when `success` is true.
    #[serde(default)]
    pub message: Option<AssistantReply>,
    /// Failure description.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of the new-session endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSessionResponse {
    /// Whether a session was created.
    #[serde(default)]
    pub success: bool,
    /// Page to navigate to for the new session.
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Failure description.
    #[serde(default)]
    pub error: Option<String>,
}

impl NewSessionResponse {
    /// Failure description, falling back to [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn error_message(&self) -> &str {
        error_or_unknown(self.error.as_deref())
    }
}

/// Response body of the optional chat statistics endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatStatsSeries {
    /// Whether statistics are available.
    #[serde(default)]
    pub success: bool,
    /// Day labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Message counts per label.
    #[serde(default)]
    pub values: Vec<f64>,
}

/// Author of a persisted chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoredMessageKind {
    /// Sent by the user.
    User,
    /// Produced by the assistant.
    Ai,
}

/// Chat message as persisted in local storage and in exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredMessage {
    /// Local message id.
    pub id: u64,
    /// Author.
    #[serde(rename = "type")]
    pub kind: StoredMessageKind,
    /// Message text.
    pub message: String,
    /// Display timestamp.
    pub timestamp: String,
}

/// Usage counters persisted under `chat_chatStats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatStats {
    /// Messages answered successfully.
    #[serde(default)]
    pub messages_count: u64,
    /// Sessions created from this browser.
    #[serde(default)]
    pub sessions_count: u64,
    /// RFC 3339 timestamp of the last successful exchange.
    #[serde(default)]
    pub last_activity: Option<String>,
}

/// Transcript mirror persisted under `chat_messageHistory`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredHistory {
    /// Session the messages belong to.
    #[serde(default)]
    pub session_id: String,
    /// Non-temporary messages in on-screen order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<StoredMessage>,
}

/// Downloadable chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatExport {
    /// Session the transcript belongs to.
    pub session_id: String,
    /// Messages in on-screen order.
    pub messages: Vec<StoredMessage>,
    /// RFC 3339 export timestamp.
    pub export_date: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Grid position of one widget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutCell {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

/// Persisted widget placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Widget id from the registry.
    pub id: String,
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl LayoutEntry {
    /// Build an entry from an id and a cell.
    #[must_use]
    pub fn new(id: impl Into<String>, cell: LayoutCell) -> Self {
        Self {
            id: id.into(),
            x: cell.x,
            y: cell.y,
            w: cell.w,
            h: cell.h,
        }
    }

    /// Position without the id.
    #[must_use]
    pub const fn cell(&self) -> LayoutCell {
        LayoutCell {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

/// Per-widget user settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetSettings {
    /// Title shown instead of the registry name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Blob persisted under `dashboard-preferences`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardPreferences {
    /// Last layout captured in edit mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<LayoutEntry>>,
    /// Widget settings keyed by widget id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, WidgetSettings>,
}

/// Downloadable dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExport {
    /// RFC 3339 export timestamp.
    pub export_date: String,
    /// Widgets in grid order with their positions.
    pub layout: Vec<LayoutEntry>,
    /// Widget settings keyed by widget id.
    pub settings: BTreeMap<String, WidgetSettings>,
}

/// `kpi-empenhos` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KpiEmpenhosData {
    /// Total commitments.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: f64,
    /// Active commitments.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ativos: f64,
}

/// `kpi-financeiro` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KpiFinanceiroData {
    /// Total committed value.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor_total: f64,
    /// Variation against the previous month, in percent.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub variacao: f64,
}

/// Label/value pair used by small charts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    /// Slice label.
    #[serde(default)]
    pub label: String,
    /// Slice value.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

/// `kpi-contratos` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KpiContratosData {
    /// Contract count.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_contratos: f64,
    /// Active contracts.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ativos: f64,
    /// Contracts expiring soon.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vencendo: f64,
    /// Expired contracts.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vencidos: f64,
    /// Pre-formatted total value.
    #[serde(default)]
    pub valor_total: Option<String>,
    /// Doughnut slices.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dados_grafico: Vec<ChartPoint>,
}

/// Labelled numeric series.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Series {
    /// Axis or slice labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Values aligned with `labels`.
    #[serde(default)]
    pub values: Vec<f64>,
}

/// `grafico-evolucao` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvolucaoData {
    /// Time series; missing renders an empty chart.
    #[serde(default)]
    pub evolucao: Option<Series>,
}

/// `grafico-pizza` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PizzaData {
    /// Status distribution; missing renders placeholder slices.
    #[serde(default)]
    pub pizza: Option<Series>,
}

/// Supplier row in `tabela-top-fornecedores`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Fornecedor {
    /// Supplier name.
    #[serde(default)]
    pub nome: String,
    /// Committed value.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub valor: f64,
}

/// `tabela-top-fornecedores` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FornecedoresData {
    /// Ranked suppliers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fornecedores: Vec<Fornecedor>,
}

/// Alert entry in `alertas-sistema`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alerta {
    /// Bootstrap tone (warning, danger, info...).
    #[serde(default)]
    pub tipo: String,
    /// Icon class.
    #[serde(default)]
    pub icone: String,
    /// Bold title.
    #[serde(default)]
    pub titulo: String,
    /// Body text.
    #[serde(default)]
    pub mensagem: String,
}

/// `alertas-sistema` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertasData {
    /// Alerts, most important first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alertas: Vec<Alerta>,
}

/// Upcoming deadline in `calendario-vencimentos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vencimento {
    /// ISO date.
    #[serde(default)]
    pub data: String,
    /// Event title.
    #[serde(default)]
    pub titulo: String,
    /// Event type.
    #[serde(default)]
    pub tipo: String,
}

/// `calendario-vencimentos` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VencimentosData {
    /// Upcoming deadlines; `None` when the backend omitted the list.
    #[serde(default)]
    pub vencimentos: Option<Vec<Vencimento>>,
}

/// Synthetic body used for static widgets whose endpoint does not exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaticWidgetBody {
    /// Always true.
    pub success: bool,
    /// Marker message.
    pub message: String,
}

impl Default for StaticWidgetBody {
    fn default() -> Self {
        Self {
            success: true,
            message: "Widget estático".to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aditivo_accepts_string_numbers_and_nulls() {
        let parsed: AditivosResponse = serde_json::from_value(json!({
            "aditivos": [{
                "id": 7,
                "numero_aditivo": "2",
                "tipo": "Prazo",
                "data_aditivo": "2024-03-10",
                "valor_financeiro": null,
                "prazo_dias": "90",
                "justificativa": "Atraso na entrega"
            }]
        }))
        .expect("decode");
        let aditivo = &parsed.aditivos[0];
        assert_eq!(aditivo.numero_aditivo, 2);
        assert_eq!(aditivo.valor_financeiro, None);
        assert_eq!(aditivo.prazo_dias, Some(90));
    }

    #[test]
    fn aditivo_null_text_fields_decode_as_empty() {
        let parsed: AditivosResponse = serde_json::from_value(json!({
            "success": true,
            "aditivos": [
                {
                    "id": 1,
                    "numero_aditivo": 1,
                    "tipo": "PRORROGACAO",
                    "data_aditivo": null,
                    "valor_financeiro": null,
                    "prazo_dias": 30,
                    "justificativa": "Atraso"
                },
                {
                    "id": 2,
                    "numero_aditivo": 2,
                    "tipo": null,
                    "data_aditivo": "2024-06-01",
                    "justificativa": null
                }
            ]
        }))
        .expect("decode");
        assert_eq!(parsed.aditivos.len(), 2);
        assert_eq!(parsed.aditivos[0].data_aditivo, "");
        assert_eq!(parsed.aditivos[1].tipo, "");
        assert_eq!(parsed.aditivos[1].justificativa, "");
        assert_eq!(parsed.aditivos[1].numero_aditivo, 2);
    }

    #[test]
    fn missing_or_null_aditivos_list_is_empty() {
        let missing: AditivosResponse = serde_json::from_value(json!({})).expect("decode");
        let null: AditivosResponse =
            serde_json::from_value(json!({ "aditivos": null })).expect("decode");
        assert!(missing.aditivos.is_empty());
        assert!(null.aditivos.is_empty());
    }

    #[test]
    fn outcome_error_falls_back_to_unknown() {
        let outcome: ApiOutcome =
            serde_json::from_value(json!({ "success": false, "error": "" })).expect("decode");
        assert_eq!(outcome.error_message(), UNKNOWN_ERROR);
        let outcome: ApiOutcome =
            serde_json::from_value(json!({ "success": false, "error": "sem permissão" }))
                .expect("decode");
        assert_eq!(outcome.error_message(), "sem permissão");
    }

    #[test]
    fn history_time_label_uses_second_field() {
        let entry = HistoryEntry {
            message: "oi".into(),
            response: Some("olá".into()),
            timestamp: Some("2024-05-01 14:32".into()),
        };
        assert_eq!(entry.time_label(), Some("14:32"));
        let bare = HistoryEntry {
            timestamp: Some("14:32".into()),
            ..HistoryEntry::default()
        };
        assert_eq!(bare.time_label(), None);
    }

    #[test]
    fn form_pairs_skip_absent_optionals() {
        let novo = NovoAditivo {
            contrato_id: "12".into(),
            numero_aditivo: 3,
            tipo: "Valor".into(),
            data_aditivo: "2024-01-02".into(),
            valor_financeiro: Some("1500.50".into()),
            prazo_dias: None,
            justificativa: "Reajuste".into(),
        };
        let keys: Vec<&str> = novo.form_pairs().iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![
                "contrato_id",
                "numero_aditivo",
                "tipo",
                "data_aditivo",
                "valor_financeiro",
                "justificativa"
            ]
        );
    }

    #[test]
    fn chat_export_uses_legacy_camel_case_keys() {
        let export = ChatExport {
            session_id: "abc".into(),
            messages: vec![StoredMessage {
                id: 1,
                kind: StoredMessageKind::User,
                message: "oi".into(),
                timestamp: "10:00".into(),
            }],
            export_date: "2024-05-01T10:00:00Z".into(),
        };
        let value = serde_json::to_value(&export).expect("encode");
        assert_eq!(value["sessionId"], "abc");
        assert_eq!(value["messages"][0]["type"], "user");
        assert!(value.get("exportDate").is_some());
    }

    #[test]
    fn empty_preferences_serialize_to_empty_object() {
        let encoded = serde_json::to_string(&DashboardPreferences::default()).expect("encode");
        assert_eq!(encoded, "{}");
    }
}
