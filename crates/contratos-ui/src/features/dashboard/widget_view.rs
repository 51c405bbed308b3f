//! Widget body markup.

use crate::components::empty_state::EmptyState;
use crate::features::dashboard::charts::{ChartSlot, canvas_id};
use crate::features::dashboard::widgets::{
    LOAD_ERROR_MESSAGE, LOADING_MESSAGE, NO_ALERTAS, NO_FORNECEDORES, NO_VENCIMENTOS,
    QUICK_ACTIONS, WidgetContent, WidgetPayload, active_share, active_share_label,
    calendar_entries, calendar_header, contratos_total_label, count_label, financeiro_value,
    top_alertas, top_fornecedores, variacao_label,
};
use chrono::NaiveDate;
use contratos_api_models::{
    AlertasData, FornecedoresData, KpiContratosData, KpiEmpenhosData, KpiFinanceiroData,
    VencimentosData,
};
use js_sys::Date;
use yew::prelude::*;

pub(super) fn widget_body(content: &WidgetContent, token: &str) -> Html {
    match content {
        WidgetContent::Loading => html! {
            <div class="widget-loading text-muted d-flex align-items-center">
                <div class="spinner-border spinner-border-sm me-2" role="status"></div>
                {LOADING_MESSAGE}
            </div>
        },
        WidgetContent::Failed(_) => html! {
            <div class="alert alert-danger">
                <i class="bi bi-exclamation-triangle me-2"></i>
                {LOAD_ERROR_MESSAGE}
            </div>
        },
        WidgetContent::Ready(payload) => payload_body(payload, token),
    }
}

fn payload_body(payload: &WidgetPayload, token: &str) -> Html {
    match payload {
        WidgetPayload::KpiEmpenhos(data) => kpi_empenhos(data),
        WidgetPayload::KpiFinanceiro(data) => kpi_financeiro(data),
        WidgetPayload::KpiContratos(data) => kpi_contratos(data, token),
        WidgetPayload::Evolucao(_) => chart_canvas(ChartSlot::Evolucao, token),
        WidgetPayload::Pizza(_) => chart_canvas(ChartSlot::Pizza, token),
        WidgetPayload::Fornecedores(data) => fornecedores(data),
        WidgetPayload::Alertas(data) => alertas(data),
        WidgetPayload::AcoesRapidas => acoes_rapidas(),
        WidgetPayload::Calendario(data) => calendario(data),
    }
}

fn mini_card(tone: &'static str, value: String, label: &'static str) -> Html {
    html! {
        <div class={classes!("kpi-mini-card", tone)}>
            <div class="kpi-mini-value">{value}</div>
            <div class="kpi-mini-label">{label}</div>
        </div>
    }
}

fn kpi_empenhos(data: &KpiEmpenhosData) -> Html {
    let width = format!("width: {:.1}%;", active_share(data));
    html! {
        <div class="row g-3 h-100">
            <div class="col-6">{mini_card("bg-primary", count_label(data.total), "Total")}</div>
            <div class="col-6">{mini_card("bg-success", count_label(data.ativos), "Ativos")}</div>
            <div class="col-12">
                <div class="progress" style="height: 8px;">
                    <div class="progress-bar bg-primary" style={width}></div>
                </div>
                <small class="text-muted">{active_share_label(data)}</small>
            </div>
        </div>
    }
}

fn kpi_financeiro(data: &KpiFinanceiroData) -> Html {
    html! {
        <div class="text-center h-100 d-flex flex-column justify-content-center">
            <div class="kpi-value text-success mb-2">{financeiro_value(data)}</div>
            <div class="kpi-label text-muted">{"Valor Total Empenhado"}</div>
            <div class="mt-2">
                <small class="text-muted">
                    <i class="bi bi-arrow-up text-success"></i>
                    {" "}{variacao_label(data)}
                </small>
            </div>
        </div>
    }
}

fn kpi_contratos(data: &KpiContratosData, token: &str) -> Html {
    html! {
        <div class="h-100">
            <div class="row g-2 h-100">
                <div class="col-12">
                    <div class="text-center">
                        <div class="kpi-value text-primary mb-1">{count_label(data.total_contratos)}</div>
                        <div class="kpi-label text-muted">{"Total de Contratos"}</div>
                    </div>
                </div>
                <div class="col-4">{mini_card("bg-success", count_label(data.ativos), "Ativos")}</div>
                <div class="col-4">{mini_card("bg-warning", count_label(data.vencendo), "Vencendo")}</div>
                <div class="col-4">{mini_card("bg-danger", count_label(data.vencidos), "Vencidos")}</div>
                <div class="col-12">
                    <div class="mt-2">
                        <div class="text-center">
                            <canvas id={canvas_id(ChartSlot::Contratos, token)} width="100" height="100"></canvas>
                        </div>
                        <div class="text-center mt-2">
                            <small class="text-muted">
                                <strong>{contratos_total_label(data)}</strong>{" valor total"}
                            </small>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn chart_canvas(slot: ChartSlot, token: &str) -> Html {
    html! {
        <div class="h-100 position-relative">
            <canvas id={canvas_id(slot, token)} class="w-100" height="200"></canvas>
        </div>
    }
}

fn fornecedores(data: &FornecedoresData) -> Html {
    let rows = top_fornecedores(data);
    if rows.is_empty() {
        return html! { <EmptyState message={NO_FORNECEDORES} /> };
    }
    html! {
        <div class="table-responsive">
            <table class="table table-sm">
                <thead><tr><th>{"Fornecedor"}</th><th>{"Valor"}</th></tr></thead>
                <tbody>
                    {for rows.into_iter().map(|row| html! {
                        <tr>
                            <td class="text-truncate" style="max-width: 150px;">{row.nome}</td>
                            <td class="text-end">{row.valor}</td>
                        </tr>
                    })}
                </tbody>
            </table>
        </div>
    }
}

fn alertas(data: &AlertasData) -> Html {
    let alertas = top_alertas(data);
    if alertas.is_empty() {
        return html! { <EmptyState message={NO_ALERTAS} /> };
    }
    html! {
        <div class="alerts-container">
            {for alertas.iter().map(|alerta| html! {
                <div class={classes!("alert", format!("alert-{}", alerta.tipo), "alert-sm", "mb-2")}>
                    <i class={classes!(alerta.icone.clone(), "me-2")}></i>
                    <strong>{format!("{}:", alerta.titulo)}</strong>
                    {" "}{alerta.mensagem.clone()}
                </div>
            })}
        </div>
    }
}

fn acoes_rapidas() -> Html {
    html! {
        <div class="row g-2">
            {for QUICK_ACTIONS.iter().map(|acao| html! {
                <div class="col-6">
                    <a href={acao.href} class={classes!("btn", format!("btn-{}", acao.tone), "btn-sm", "w-100")}>
                        <i class={classes!(acao.icon, "me-1")}></i>
                        <small>{acao.label}</small>
                    </a>
                </div>
            })}
        </div>
    }
}

fn today() -> Option<NaiveDate> {
    let now = Date::new_0();
    NaiveDate::from_ymd_opt(
        i32::try_from(now.get_full_year()).ok()?,
        now.get_month() + 1,
        now.get_date(),
    )
}

fn calendario(data: &VencimentosData) -> Html {
    let header = today().map(calendar_header).unwrap_or_default();
    let events = match calendar_entries(data) {
        Some(entries) => html! {
            <>{for entries.into_iter().map(|entry| html! {
                <div class="calendar-event">
                    <div class="event-date">{entry.day.map(|day| day.to_string()).unwrap_or_default()}</div>
                    <div class="event-info">
                        <div class="event-title">{entry.titulo}</div>
                        <div class="event-type text-muted">{entry.tipo}</div>
                    </div>
                </div>
            })}</>
        },
        None => html! { <div class="text-muted">{NO_VENCIMENTOS}</div> },
    };
    html! {
        <div class="calendar-widget">
            <div class="calendar-header text-center mb-3">
                <h6 class="mb-0">{header}</h6>
            </div>
            <div class="calendar-events">{events}</div>
        </div>
    }
}
