//! Widget data loading, typed payloads and render models.
//!
//! # Design
//! - One attempt per load; failures become a placeholder, never a panic.
//! - A 404 for a static widget is expected and answered with a synthetic body.
//! - A body carrying `"error": true` is a failure even with a 200 status.

use crate::core::config::DashboardConfig;
use crate::core::error::UiError;
use crate::core::format::{day_of_month, format_brl, format_decimal_br, month_year_pt, percent};
use crate::features::dashboard::charts::{
    ChartSlot, canvas_id, contratos_config, evolucao_config, pizza_config,
};
use crate::features::dashboard::registry::{WidgetDefinition, WidgetKind};
use async_trait::async_trait;
use chrono::NaiveDate;
use contratos_api_models::{
    Alerta, AlertasData, EvolucaoData, FornecedoresData, KpiContratosData, KpiEmpenhosData,
    KpiFinanceiroData, PizzaData, StaticWidgetBody, UNKNOWN_ERROR, VencimentosData,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Placeholder while a request is in flight.
pub const LOADING_MESSAGE: &str = "Carregando dados...";
/// Placeholder after a failed load.
pub const LOAD_ERROR_MESSAGE: &str = "Erro ao carregar dados";
/// Empty supplier table.
pub const NO_FORNECEDORES: &str = "Nenhum fornecedor encontrado";
/// Empty alert list.
pub const NO_ALERTAS: &str = "Nenhum alerta";
/// Empty calendar.
pub const NO_VENCIMENTOS: &str = "Nenhum vencimento próximo";

const MAX_FORNECEDORES: usize = 5;
const MAX_ALERTAS: usize = 3;

/// Widget data endpoint.
#[async_trait(?Send)]
pub trait WidgetBackend {
    /// `GET` the raw JSON body of a widget.
    async fn widget_data(&self, url: &str) -> Result<Value, UiError>;
}

/// Decoded body of one widget.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetPayload {
    /// `kpi-empenhos`.
    KpiEmpenhos(KpiEmpenhosData),
    /// `kpi-financeiro`.
    KpiFinanceiro(KpiFinanceiroData),
    /// `kpi-contratos`.
    KpiContratos(KpiContratosData),
    /// `grafico-evolucao`.
    Evolucao(EvolucaoData),
    /// `grafico-pizza`.
    Pizza(PizzaData),
    /// `tabela-top-fornecedores`.
    Fornecedores(FornecedoresData),
    /// `alertas-sistema`.
    Alertas(AlertasData),
    /// `acoes-rapidas`; content is static.
    AcoesRapidas,
    /// `calendario-vencimentos`.
    Calendario(VencimentosData),
}

/// What a widget body currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WidgetContent {
    /// Request in flight.
    #[default]
    Loading,
    /// Payload ready to render.
    Ready(WidgetPayload),
    /// Load failed; the reason is kept for logging.
    Failed(String),
}

impl WidgetContent {
    /// Content for a finished load.
    #[must_use]
    pub fn from_result(result: Result<WidgetPayload, UiError>) -> Self {
        match result {
            Ok(payload) => Self::Ready(payload),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, UiError> {
    serde_json::from_value(value).map_err(|err| UiError::Decode(err.to_string()))
}

/// Decode `value` as the payload of `kind`.
///
/// # Errors
/// Returns [`UiError::Application`] for an `"error": true` body and
/// [`UiError::Decode`] when the shape does not match.
pub fn decode_payload(kind: WidgetKind, value: Value) -> Result<WidgetPayload, UiError> {
    if value.get("error").and_then(Value::as_bool) == Some(true) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or(UNKNOWN_ERROR);
        return Err(UiError::Application(message.to_string()));
    }
    Ok(match kind {
        WidgetKind::KpiEmpenhos => WidgetPayload::KpiEmpenhos(decode(value)?),
        WidgetKind::KpiFinanceiro => WidgetPayload::KpiFinanceiro(decode(value)?),
        WidgetKind::KpiContratos => WidgetPayload::KpiContratos(decode(value)?),
        WidgetKind::GraficoEvolucao => WidgetPayload::Evolucao(decode(value)?),
        WidgetKind::GraficoPizza => WidgetPayload::Pizza(decode(value)?),
        WidgetKind::TopFornecedores => WidgetPayload::Fornecedores(decode(value)?),
        WidgetKind::Alertas => WidgetPayload::Alertas(decode(value)?),
        WidgetKind::AcoesRapidas => WidgetPayload::AcoesRapidas,
        WidgetKind::Calendario => WidgetPayload::Calendario(decode(value)?),
    })
}

/// Fetch and decode one widget's data.
///
/// # Errors
/// Propagates transport, HTTP and decode failures; a 404 for a static widget
/// is answered with [`StaticWidgetBody`].
pub async fn load_widget(
    backend: &dyn WidgetBackend,
    config: &DashboardConfig,
    definition: &WidgetDefinition,
) -> Result<WidgetPayload, UiError> {
    let kind = WidgetKind::from_id(definition.id)
        .ok_or_else(|| UiError::Application(format!("widget desconhecido: {}", definition.id)))?;
    let value = match backend.widget_data(&config.widget_url(definition.id)).await {
        Ok(value) => value,
        Err(err) if err.is_not_found() && kind.is_static() => {
            serde_json::to_value(StaticWidgetBody::default())
                .map_err(|err| UiError::Decode(err.to_string()))?
        }
        Err(err) => return Err(err),
    };
    decode_payload(kind, value)
}

/// Chart to build once a payload is on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    /// Target canvas.
    pub canvas_id: String,
    /// Chart.js configuration.
    pub config: Value,
}

/// Charts owned by `payload` for the widget rendered with `token`.
#[must_use]
pub fn chart_specs(payload: &WidgetPayload, token: &str) -> Vec<ChartSpec> {
    let spec = |slot, config| ChartSpec {
        canvas_id: canvas_id(slot, token),
        config,
    };
    match payload {
        WidgetPayload::KpiContratos(data) => {
            vec![spec(ChartSlot::Contratos, contratos_config(&data.dados_grafico))]
        }
        WidgetPayload::Evolucao(data) => {
            vec![spec(ChartSlot::Evolucao, evolucao_config(data.evolucao.as_ref()))]
        }
        WidgetPayload::Pizza(data) => {
            vec![spec(ChartSlot::Pizza, pizza_config(data.pizza.as_ref()))]
        }
        _ => Vec::new(),
    }
}

/// Active share of commitments, in percent.
#[must_use]
pub fn active_share(data: &KpiEmpenhosData) -> f64 {
    percent(data.ativos, data.total)
}

/// "42,5% ativos".
#[must_use]
pub fn active_share_label(data: &KpiEmpenhosData) -> String {
    format!("{}% ativos", format_decimal_br(active_share(data), 1))
}

/// Headline value of the financial KPI.
#[must_use]
pub fn financeiro_value(data: &KpiFinanceiroData) -> String {
    format_brl(data.valor_total)
}

/// "3,2% vs mês anterior".
#[must_use]
pub fn variacao_label(data: &KpiFinanceiroData) -> String {
    format!("{}% vs mês anterior", format_decimal_br(data.variacao, 1))
}

/// Whole-number KPI count.
#[must_use]
pub fn count_label(value: f64) -> String {
    format_decimal_br(value, 0)
}

/// Pre-formatted contract total, `R$ 0,00` when absent.
#[must_use]
pub fn contratos_total_label(data: &KpiContratosData) -> String {
    data.valor_total
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| format_brl(0.0), str::to_string)
}

/// Supplier row of the ranking table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FornecedorRow {
    /// Supplier name.
    pub nome: String,
    /// Formatted value.
    pub valor: String,
}

/// First five suppliers.
#[must_use]
pub fn top_fornecedores(data: &FornecedoresData) -> Vec<FornecedorRow> {
    data.fornecedores
        .iter()
        .take(MAX_FORNECEDORES)
        .map(|fornecedor| FornecedorRow {
            nome: fornecedor.nome.clone(),
            valor: format_brl(fornecedor.valor),
        })
        .collect()
}

/// First three alerts.
#[must_use]
pub fn top_alertas(data: &AlertasData) -> &[Alerta] {
    let end = data.alertas.len().min(MAX_ALERTAS);
    &data.alertas[..end]
}

/// Shortcut link of the quick actions widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickAction {
    /// Caption.
    pub label: &'static str,
    /// Target page.
    pub href: &'static str,
    /// Bootstrap icon class.
    pub icon: &'static str,
    /// Bootstrap tone.
    pub tone: &'static str,
}

/// Links shown by `acoes-rapidas`.
pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        label: "Novo Empenho",
        href: "/empenhos/novo",
        icon: "bi-plus-circle",
        tone: "primary",
    },
    QuickAction {
        label: "Relatório Filtrado",
        href: "/relatorios/filtrado",
        icon: "bi-funnel",
        tone: "info",
    },
    QuickAction {
        label: "Exportar Excel",
        href: "/relatorios/exportar/excel",
        icon: "bi-file-excel",
        tone: "success",
    },
    QuickAction {
        label: "Dashboard Analytics",
        href: "/relatorios/analytics",
        icon: "bi-graph-up",
        tone: "warning",
    },
];

/// Calendar line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarEntry {
    /// Day of month, when the date parses.
    pub day: Option<u32>,
    /// Event title.
    pub titulo: String,
    /// Event type.
    pub tipo: String,
}

/// Calendar lines; `None` when there is nothing to show.
#[must_use]
pub fn calendar_entries(data: &VencimentosData) -> Option<Vec<CalendarEntry>> {
    let vencimentos = data.vencimentos.as_ref().filter(|list| !list.is_empty())?;
    Some(
        vencimentos
            .iter()
            .map(|vencimento| CalendarEntry {
                day: day_of_month(&vencimento.data),
                titulo: vencimento.titulo.clone(),
                tipo: vencimento.tipo.clone(),
            })
            .collect(),
    )
}

/// Calendar header for `today`.
#[must_use]
pub fn calendar_header(today: NaiveDate) -> String {
    month_year_pt(today)
}
