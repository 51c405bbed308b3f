//! Aditivos modal component.
//!
//! # Design
//! - Server-rendered pages open the modal through [`request_open`]; the
//!   request lives in a yewdux store so the mounted component can react.
//! - Every mutation ends with a list reload; detail pages also reload the page.

use crate::components::empty_state::EmptyState;
use crate::components::modal::Modal;
use crate::core::config::AditivosConfig;
use crate::features::aditivos::api::{
    LOAD_ERROR_MESSAGE, MutationOutcome, delete_aditivo, load_aditivos, submit_aditivo,
};
use crate::features::aditivos::logic::{AditivoRow, TIPO_OPTIONS};
use crate::features::aditivos::state::{AditivosAction, AditivosState, FormField, ListStatus};
use crate::services::api::HttpClient;
use crate::services::dialogs::BrowserPrompt;
use crate::services::page::{current_path, reload_after};
use gloo::console;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::platform::spawn_local;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_store};
use yewdux::store::Store;

const PAGE_RELOAD_DELAY_MS: u32 = 1_000;

/// Latest open request; `seq` changes on every request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct OpenRequest {
    seq: u64,
    contrato_id: String,
    numero_contrato: String,
}

/// Ask the mounted modal to open for a contract.
pub fn request_open(contrato_id: String, numero_contrato: String) {
    Dispatch::<OpenRequest>::new().reduce_mut(move |request| {
        request.seq += 1;
        request.contrato_id = contrato_id;
        request.numero_contrato = numero_contrato;
    });
}

fn field_value(event: &Event) -> Option<String> {
    let target = event.target()?;
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    target
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value)
}

/// Modal listing, creating and deleting the amendments of one contract.
#[function_component(AditivosModal)]
pub fn aditivos_modal() -> Html {
    let (request, _) = use_store::<OpenRequest>();
    let state = use_reducer(AditivosState::default);
    let config = use_memo(|_| AditivosConfig::for_path(&current_path()), ());

    let reload_list = {
        let dispatcher = state.dispatcher();
        Callback::from(move |contrato_id: String| {
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                match load_aditivos(&HttpClient::new(), &contrato_id).await {
                    Ok(list) => dispatcher.dispatch(AditivosAction::Loaded(list)),
                    Err(err) => {
                        console::error!("Erro ao carregar aditivos:", err.to_string());
                        dispatcher.dispatch(AditivosAction::LoadFailed);
                    }
                }
            });
        })
    };

    {
        let dispatcher = state.dispatcher();
        let reload_list = reload_list.clone();
        use_effect_with_deps(
            move |request: &std::rc::Rc<OpenRequest>| {
                if request.seq > 0 {
                    dispatcher.dispatch(AditivosAction::Open {
                        contrato_id: request.contrato_id.clone(),
                        numero_contrato: request.numero_contrato.clone(),
                    });
                    reload_list.emit(request.contrato_id.clone());
                }
                || ()
            },
            request,
        );
    }

    let after_mutation = {
        let dispatcher = state.dispatcher();
        let reload_list = reload_list.clone();
        let config = config.clone();
        Callback::from(move |(contrato_id, outcome): (String, MutationOutcome)| {
            match outcome {
                MutationOutcome::Saved => {
                    dispatcher.dispatch(AditivosAction::ResetForm);
                    reload_list.emit(contrato_id);
                    if config.reload_on_change {
                        reload_after(PAGE_RELOAD_DELAY_MS);
                    }
                }
                MutationOutcome::Failed(err) => console::error!("Erro:", err.to_string()),
                MutationOutcome::Rejected(_)
                | MutationOutcome::Cancelled
                | MutationOutcome::Invalid(_) => {}
            }
        })
    };

    let on_submit = {
        let state = state.clone();
        let after_mutation = after_mutation.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if state.saving {
                return;
            }
            let contrato_id = state.contrato_id.clone();
            let form = state.form.clone();
            let dispatcher = state.dispatcher();
            let after_mutation = after_mutation.clone();
            dispatcher.dispatch(AditivosAction::SetSaving(true));
            spawn_local(async move {
                let outcome =
                    submit_aditivo(&HttpClient::new(), &BrowserPrompt, &contrato_id, &form).await;
                dispatcher.dispatch(AditivosAction::SetSaving(false));
                after_mutation.emit((contrato_id, outcome));
            });
        })
    };

    let on_delete = {
        let contrato_id = state.contrato_id.clone();
        Callback::from(move |aditivo_id: i64| {
            let contrato_id = contrato_id.clone();
            let after_mutation = after_mutation.clone();
            spawn_local(async move {
                let outcome = delete_aditivo(&HttpClient::new(), &BrowserPrompt, aditivo_id).await;
                after_mutation.emit((contrato_id, outcome));
            });
        })
    };

    let on_close = {
        let dispatcher = state.dispatcher();
        Callback::from(move |()| dispatcher.dispatch(AditivosAction::Close))
    };

    let edit = |field: FormField| {
        let dispatcher = state.dispatcher();
        Callback::from(move |event: Event| {
            if let Some(value) = field_value(&event) {
                dispatcher.dispatch(AditivosAction::Edit(field, value));
            }
        })
    };

    let title = html! {
        <>
            <i class="bi bi-file-earmark-plus me-2"></i>
            {"Aditivos do Contrato "}
            <strong>{state.numero_contrato.clone()}</strong>
        </>
    };

    html! {
        <Modal open={state.open} title={title} size_class={classes!("modal-lg")} on_close={on_close}>
            <h6 class="mb-3">{"Aditivos existentes"}</h6>
            {render_list(&state, &on_delete)}
            <hr />
            <h6 class="mb-3">{"Novo Aditivo"}</h6>
            <form onsubmit={on_submit}>
                <div class="row g-3">
                    <div class="col-md-4">
                        <label class="form-label">{"Número *"}</label>
                        <select class="form-select" onchange={edit(FormField::Numero)}>
                            {for state.number_options().into_iter().map(|numero| {
                                let value = numero.to_string();
                                let selected = value == state.form.numero_aditivo;
                                html! { <option value={value.clone()} selected={selected}>{format!("{numero}°")}</option> }
                            })}
                        </select>
                    </div>
                    <div class="col-md-4">
                        <label class="form-label">{"Tipo *"}</label>
                        <select class="form-select" onchange={edit(FormField::Tipo)}>
                            <option value="" selected={state.form.tipo.is_empty()}>{"Selecione..."}</option>
                            {for TIPO_OPTIONS.iter().map(|(value, label)| html! {
                                <option value={*value} selected={state.form.tipo == *value}>{*label}</option>
                            })}
                        </select>
                    </div>
                    <div class="col-md-4">
                        <label class="form-label">{"Data *"}</label>
                        <input type="date" class="form-control" value={state.form.data_aditivo.clone()} onchange={edit(FormField::Data)} />
                    </div>
                    <div class="col-md-6">
                        <label class="form-label">{"Valor financeiro"}</label>
                        <input type="number" step="0.01" class="form-control" value={state.form.valor_financeiro.clone()} onchange={edit(FormField::Valor)} />
                    </div>
                    <div class="col-md-6">
                        <label class="form-label">{"Prazo (dias)"}</label>
                        <input type="number" min="0" class="form-control" value={state.form.prazo_dias.clone()} onchange={edit(FormField::Prazo)} />
                    </div>
                    <div class="col-12">
                        <label class="form-label">{"Justificativa *"}</label>
                        <textarea class="form-control" rows="3" value={state.form.justificativa.clone()} onchange={edit(FormField::Justificativa)}></textarea>
                    </div>
                </div>
                <div class="d-flex justify-content-end mt-3">
                    <button type="submit" class="btn btn-primary" disabled={state.saving}>
                        <i class="bi bi-check-lg me-1"></i>
                        {if state.saving { "Salvando..." } else { "Salvar Aditivo" }}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

fn render_list(state: &AditivosState, on_delete: &Callback<i64>) -> Html {
    match &state.list {
        ListStatus::Loading => html! {
            <div class="text-muted d-flex align-items-center">
                <div class="spinner-border spinner-border-sm me-2" role="status"></div>
                {"Carregando..."}
            </div>
        },
        ListStatus::Failed => html! {
            <div class="alert alert-warning">{LOAD_ERROR_MESSAGE}</div>
        },
        ListStatus::Loaded(list) if list.is_empty() => html! {
            <EmptyState message="Nenhum aditivo cadastrado ainda." icon="bi-info-circle" class={classes!("text-start")} />
        },
        ListStatus::Loaded(_) => html! {
            <div class="list-group">
                {for state.rows().into_iter().map(|row| render_row(row, on_delete.clone()))}
            </div>
        },
    }
}

fn render_row(row: AditivoRow, on_delete: Callback<i64>) -> Html {
    let id = row.id;
    let onclick = Callback::from(move |_| on_delete.emit(id));
    html! {
        <div class="list-group-item">
            <div class="d-flex justify-content-between align-items-start">
                <div>
                    <h6 class="mb-1">{row.heading}</h6>
                    <p class="mb-1"><strong>{"Tipo: "}</strong>{row.tipo}</p>
                    <p class="mb-1"><strong>{"Data: "}</strong>{row.data}</p>
                    {row.valor.map(|valor| html! {
                        <p class="mb-1"><strong>{"Valor: "}</strong>{valor}</p>
                    }).unwrap_or_default()}
                    {row.prazo.map(|prazo| html! {
                        <p class="mb-1"><strong>{"Prazo: "}</strong>{prazo}</p>
                    }).unwrap_or_default()}
                    <small>{row.justificativa}</small>
                </div>
                <button class="btn btn-outline-danger btn-sm" title="Excluir" {onclick}>
                    <i class="bi bi-trash"></i>
                </button>
            </div>
        </div>
    }
}
