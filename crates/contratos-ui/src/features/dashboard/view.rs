//! Dashboard component.
//!
//! # Design
//! - Yew renders every grid item; GridStack only positions them and reports
//!   changes back through the reducer.
//! - Widget loads are keyed by render token so a refresh never races an older load.
//! - Page scripts reach the component through [`request_refresh`].

use crate::components::modal::Modal;
use crate::core::config::DashboardConfig;
use crate::core::notify::{ToastKind, notify};
use crate::core::storage::DASHBOARD_PREFERENCES_KEY;
use crate::features::dashboard::charts::{ChartRegistry, canvas_ids_for};
use crate::features::dashboard::layout::{
    GridOptions, LayoutEngineKind, css_placement, grid_rows,
};
use crate::features::dashboard::registry::{WidgetDefinition, categories, in_category};
use crate::features::dashboard::state::{
    DashboardAction, DashboardState, LoadTracker, WidgetInstance, export_file_name,
    reset_preferences,
};
use crate::features::dashboard::widget_view::widget_body;
use crate::features::dashboard::widgets::{ChartSpec, WidgetContent, chart_specs, load_widget};
use crate::services::api::HttpClient;
use crate::services::charts::JsChart;
use crate::services::dialogs::BrowserPrompt;
use crate::services::download::download_json;
use crate::services::grid::{GridHandle, ID_ATTRIBUTE};
use crate::services::page::reload;
use crate::services::storage::{BrowserStore, load_or_default, log_storage_error};
use contratos_api_models::LayoutCell;
use gloo::console;
use js_sys::Date;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use uuid::Uuid;
use web_sys::{Element, HtmlInputElement};
use yew::platform::spawn_local;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_store};
use yewdux::store::Store;

/// Latest refresh request from page scripts; `seq` changes on every request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct RefreshRequest {
    seq: u64,
    target: Option<String>,
}

/// Reload one widget, or every widget when `widget_id` is `None`.
pub fn request_refresh(widget_id: Option<String>) {
    Dispatch::<RefreshRequest>::new().reduce_mut(move |request| {
        request.seq += 1;
        request.target = widget_id;
    });
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn save_preferences(state: &DashboardState) -> bool {
    match state.save(&BrowserStore) {
        Ok(()) => true,
        Err(err) => {
            log_storage_error("set", DASHBOARD_PREFERENCES_KEY, &err.to_string());
            false
        }
    }
}

fn find_item(grid_ref: &NodeRef, id: &str) -> Option<Element> {
    grid_ref
        .cast::<Element>()?
        .query_selector(&format!("[{ID_ATTRIBUTE}=\"{id}\"]"))
        .ok()
        .flatten()
}

/// Props for [`Dashboard`].
#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    /// Mount configuration.
    pub config: DashboardConfig,
}

/// Per-widget header callbacks.
struct WidgetHandlers {
    refresh: Callback<String>,
    configure: Callback<String>,
    remove: Callback<String>,
}

/// Drag-and-drop dashboard.
#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let config = use_memo(|config: &DashboardConfig| config.clone(), props.config.clone());
    let state = {
        let columns = props.config.columns;
        use_reducer(move || {
            DashboardState::from_preferences(
                load_or_default(DASHBOARD_PREFERENCES_KEY),
                columns,
                new_token,
            )
        })
    };
    let engine = use_state(|| LayoutEngineKind::detect(GridHandle::available()));
    let grid_ref = use_node_ref();
    let grid = use_mut_ref(|| None::<GridHandle>);
    let charts = use_mut_ref(ChartRegistry::<JsChart>::new);
    let requested = use_mut_ref(LoadTracker::default);
    let adopted = use_mut_ref(HashSet::<String>::new);
    let tokens: Rc<RefCell<HashMap<String, String>>> = use_mut_ref(HashMap::new);
    let library_open = use_state(|| false);
    let settings_draft = use_state(|| None::<(String, String)>);
    let (refresh_request, _) = use_store::<RefreshRequest>();

    let placed: Vec<(String, String)> = state
        .widgets
        .iter()
        .map(|widget| (widget.definition.id.to_string(), widget.token.clone()))
        .collect();

    {
        let tokens = tokens.clone();
        use_effect_with_deps(
            move |placed: &Vec<(String, String)>| {
                *tokens.borrow_mut() = placed.iter().cloned().collect();
                || ()
            },
            placed.clone(),
        );
    }

    {
        let dispatcher = state.dispatcher();
        let config = config.clone();
        let requested = requested.clone();
        let pending: Vec<(&'static WidgetDefinition, String)> = state
            .widgets
            .iter()
            .filter(|widget| matches!(widget.content, WidgetContent::Loading))
            .map(|widget| (widget.definition, widget.token.clone()))
            .collect();
        use_effect_with_deps(
            move |pending: &Vec<(&'static WidgetDefinition, String)>| {
                let fresh = requested
                    .borrow_mut()
                    .claim(pending.iter().map(|(_, token)| token.as_str()));
                for (definition, token) in pending {
                    if !fresh.contains(token) {
                        continue;
                    }
                    let definition = *definition;
                    let token = token.clone();
                    let dispatcher = dispatcher.clone();
                    let config = config.clone();
                    spawn_local(async move {
                        let result = load_widget(&HttpClient::new(), &config, definition).await;
                        if let Err(err) = &result {
                            console::error!(
                                "Erro ao carregar dados do widget",
                                definition.id,
                                err.to_string()
                            );
                        }
                        dispatcher.dispatch(DashboardAction::SetContent {
                            token,
                            content: WidgetContent::from_result(result),
                        });
                    });
                }
                || ()
            },
            pending,
        );
    }

    {
        let grid_ref = grid_ref.clone();
        let grid = grid.clone();
        let charts = charts.clone();
        let tokens = tokens.clone();
        let adopted = adopted.clone();
        let dispatcher = state.dispatcher();
        let engine = engine.clone();
        let options = GridOptions::from_config(&config);
        let initial: Vec<String> = placed.iter().map(|(id, _)| id.clone()).collect();
        use_effect_with_deps(
            move |_| {
                if engine.supports_drag() {
                    let handle = grid_ref
                        .cast::<Element>()
                        .ok_or_else(|| anyhow::anyhow!("grid element not mounted"))
                        .and_then(|element| GridHandle::init(&element, &options));
                    match handle {
                        Ok(mut handle) => {
                            handle.on_change(Callback::from(move |entries| {
                                dispatcher.dispatch(DashboardAction::LayoutChanged(entries));
                            }));
                            let settled_charts = charts.clone();
                            handle.on_settled(Callback::from(move |id: String| {
                                if let Some(token) = tokens.borrow().get(&id) {
                                    settled_charts
                                        .borrow()
                                        .resize_within(&canvas_ids_for(token));
                                }
                            }));
                            adopted.borrow_mut().extend(initial);
                            *grid.borrow_mut() = Some(handle);
                        }
                        Err(err) => {
                            console::error!("Erro ao inicializar GridStack:", err.to_string());
                            engine.set(LayoutEngineKind::StaticFallback);
                        }
                    }
                } else {
                    console::warn!("GridStack não disponível; usando grade estática");
                }
                move || {
                    grid.borrow_mut().take();
                    charts.borrow_mut().clear();
                }
            },
            (),
        );
    }

    {
        let grid = grid.clone();
        let grid_ref = grid_ref.clone();
        let adopted = adopted.clone();
        let ids: Vec<String> = placed.iter().map(|(id, _)| id.clone()).collect();
        use_effect_with_deps(
            move |ids: &Vec<String>| {
                if let Some(handle) = grid.borrow().as_ref() {
                    for id in ids {
                        if adopted.borrow().contains(id) {
                            continue;
                        }
                        if let Some(element) = find_item(&grid_ref, id) {
                            handle.make_widget(&element);
                            adopted.borrow_mut().insert(id.clone());
                        }
                    }
                }
                adopted.borrow_mut().retain(|id| ids.contains(id));
                || ()
            },
            ids,
        );
    }

    {
        let grid = grid.clone();
        use_effect_with_deps(
            move |editing: &bool| {
                if let Some(handle) = grid.borrow().as_ref() {
                    handle.set_editable(*editing);
                }
                || ()
            },
            state.editing,
        );
    }

    {
        let charts = charts.clone();
        let specs: Vec<ChartSpec> = state
            .widgets
            .iter()
            .filter_map(|widget| match &widget.content {
                WidgetContent::Ready(payload) => Some(chart_specs(payload, &widget.token)),
                WidgetContent::Loading | WidgetContent::Failed(_) => None,
            })
            .flatten()
            .collect();
        use_effect_with_deps(
            move |specs: &Vec<ChartSpec>| {
                if !specs.is_empty() && !JsChart::available() {
                    console::warn!("Chart.js não carregado; gráficos omitidos");
                } else {
                    let mut charts = charts.borrow_mut();
                    for spec in specs {
                        if charts.contains(&spec.canvas_id) {
                            continue;
                        }
                        let result = charts.replace_with(&spec.canvas_id, || {
                            JsChart::create(&spec.canvas_id, &spec.config)
                        });
                        if let Err(err) = result {
                            console::error!("Erro ao criar gráfico", &spec.canvas_id, err.to_string());
                        }
                    }
                }
                || ()
            },
            specs,
        );
    }

    let on_refresh = {
        let dispatcher = state.dispatcher();
        let charts = charts.clone();
        let tokens = tokens.clone();
        Callback::from(move |id: String| {
            if let Some(token) = tokens.borrow().get(&id) {
                charts.borrow_mut().release_token(token);
            }
            dispatcher.dispatch(DashboardAction::Reload {
                id,
                token: new_token(),
            });
        })
    };

    {
        let on_refresh = on_refresh.clone();
        let tokens = tokens.clone();
        use_effect_with_deps(
            move |request: &Rc<RefreshRequest>| {
                if request.seq > 0 {
                    match &request.target {
                        Some(id) => on_refresh.emit(id.clone()),
                        None => {
                            let ids: Vec<String> = tokens.borrow().keys().cloned().collect();
                            for id in ids {
                                on_refresh.emit(id);
                            }
                        }
                    }
                }
                || ()
            },
            refresh_request,
        );
    }

    let on_remove = {
        let dispatcher = state.dispatcher();
        let grid = grid.clone();
        let grid_ref = grid_ref.clone();
        let charts = charts.clone();
        let tokens = tokens.clone();
        let adopted = adopted.clone();
        Callback::from(move |id: String| {
            if let (Some(handle), Some(element)) =
                (grid.borrow().as_ref(), find_item(&grid_ref, &id))
            {
                handle.remove_widget(&element);
            }
            adopted.borrow_mut().remove(&id);
            if let Some(token) = tokens.borrow().get(&id) {
                charts.borrow_mut().release_token(token);
            }
            dispatcher.dispatch(DashboardAction::Remove(id));
            notify(ToastKind::Success, "Widget removido com sucesso!");
        })
    };

    let on_configure = {
        let state = state.clone();
        let settings_draft = settings_draft.clone();
        Callback::from(move |id: String| {
            let current = state
                .widget(&id)
                .map(|widget| state.title_of(widget).to_string())
                .unwrap_or_default();
            settings_draft.set(Some((id, current)));
        })
    };

    let on_toggle_edit = {
        let state = state.clone();
        Callback::from(move |_| {
            if state.editing && save_preferences(&state) {
                notify(ToastKind::Success, "Layout salvo com sucesso!");
            }
            state.dispatch(DashboardAction::ToggleEdit);
        })
    };

    let on_save = {
        let state = state.clone();
        Callback::from(move |_| {
            if save_preferences(&state) {
                notify(ToastKind::Success, "Layout salvo com sucesso!");
            }
        })
    };

    let on_reset = Callback::from(|_| {
        if reset_preferences(&BrowserPrompt, &BrowserStore) {
            reload();
        }
    });

    let on_export = {
        let state = state.clone();
        Callback::from(move |_| {
            let export_date: String = Date::new_0().to_iso_string().into();
            let result = serde_json::to_string_pretty(&state.export(&export_date))
                .map_err(anyhow::Error::from)
                .and_then(|encoded| download_json(&export_file_name(&export_date), &encoded));
            if let Err(err) = result {
                console::error!("Erro ao exportar dashboard:", err.to_string());
            }
        })
    };

    let on_add = {
        let state = state.clone();
        let library_open = library_open.clone();
        Callback::from(move |definition: &'static WidgetDefinition| {
            if state.contains(definition.id) {
                notify(ToastKind::Info, "Widget já está no dashboard");
            } else {
                state.dispatch(DashboardAction::Add {
                    id: definition.id.to_string(),
                    token: new_token(),
                });
                notify(
                    ToastKind::Success,
                    format!("Widget \"{}\" adicionado com sucesso!", definition.name),
                );
            }
            library_open.set(false);
        })
    };

    let handlers = WidgetHandlers {
        refresh: on_refresh,
        configure: on_configure,
        remove: on_remove,
    };

    let grid_body = html! {
        <>{for state.widgets.iter().map(|widget| render_item(&state, widget, *engine, &handlers))}</>
    };
    let grid_html = if engine.supports_drag() {
        html! {
            <div ref={grid_ref} id="dashboard-grid" class={classes!("grid-stack", state.editing.then_some("edit-mode"))}>
                {grid_body}
            </div>
        }
    } else {
        let cells: Vec<LayoutCell> = state.widgets.iter().map(|widget| widget.cell).collect();
        let style = format!(
            "display: grid; grid-template-columns: repeat({}, 1fr); grid-template-rows: repeat({}, {}px); gap: {}px;",
            state.columns,
            grid_rows(&cells).max(1),
            config.cell_height,
            config.margin
        );
        html! {
            <div ref={grid_ref} id="dashboard-grid" class={classes!("dashboard-static-grid", state.editing.then_some("edit-mode"))} {style}>
                {grid_body}
            </div>
        }
    };

    html! {
        <div class="dashboard">
            <div class="dashboard-toolbar d-flex flex-wrap gap-2 mb-3">
                {render_edit_toggle(state.editing, on_toggle_edit)}
                <button id="add-widget-btn" class="btn btn-outline-secondary"
                    onclick={{
                        let library_open = library_open.clone();
                        Callback::from(move |_| library_open.set(true))
                    }}>
                    <i class="bi bi-plus-lg me-1"></i>{"Adicionar Widget"}
                </button>
                {if state.editing {
                    html! {
                        <div id="edit-controls" class="d-flex gap-2">
                            <button id="save-layout-btn" class="btn btn-outline-success" onclick={on_save}>
                                <i class="bi bi-save me-1"></i>{"Salvar Layout"}
                            </button>
                            <button id="reset-layout-btn" class="btn btn-outline-danger" onclick={on_reset}>
                                <i class="bi bi-arrow-counterclockwise me-1"></i>{"Resetar"}
                            </button>
                        </div>
                    }
                } else {
                    html! {}
                }}
                <button id="export-dashboard-btn" class="btn btn-outline-secondary ms-auto" onclick={on_export}>
                    <i class="bi bi-download me-1"></i>{"Exportar"}
                </button>
            </div>
            {grid_html}
            {render_library(*library_open, &state, &library_open, &on_add)}
            {render_settings(&settings_draft, &state)}
        </div>
    }
}

fn render_edit_toggle(editing: bool, onclick: Callback<MouseEvent>) -> Html {
    let (class, icon, label) = if editing {
        ("btn-success", "bi-check-lg", "Finalizar Edição")
    } else {
        ("btn-outline-primary", "bi-pencil", "Editar Dashboard")
    };
    html! {
        <button id="toggle-edit-mode" class={classes!("btn", class)} {onclick}>
            <i class={classes!("bi", icon, "me-1")}></i>{label}
        </button>
    }
}

fn render_item(
    state: &DashboardState,
    widget: &WidgetInstance,
    engine: LayoutEngineKind,
    handlers: &WidgetHandlers,
) -> Html {
    let id = widget.definition.id;
    let cell = widget.cell;
    let card = render_card(state, widget, handlers);
    if engine.supports_drag() {
        html! {
            <div key={id} class="grid-stack-item" gs-id={id}
                gs-x={cell.x.to_string()} gs-y={cell.y.to_string()}
                gs-w={cell.w.to_string()} gs-h={cell.h.to_string()}>
                <div class="grid-stack-item-content widget-container">{card}</div>
            </div>
        }
    } else {
        html! {
            <div key={id} class="dashboard-static-item widget-container" gs-id={id} style={css_placement(&cell)}>
                {card}
            </div>
        }
    }
}

fn header_button(
    tone: &'static str,
    icon: &'static str,
    title: &'static str,
    id: &'static str,
    callback: &Callback<String>,
) -> Html {
    let onclick = callback.reform(move |_: MouseEvent| id.to_string());
    html! {
        <button type="button" class={classes!("btn", "btn-sm", tone, "no-drag")} {title} {onclick}>
            <i class={classes!("bi", icon)}></i>
        </button>
    }
}

fn render_card(state: &DashboardState, widget: &WidgetInstance, handlers: &WidgetHandlers) -> Html {
    let definition = widget.definition;
    html! {
        <div class="widget card h-100 shadow-sm">
            <div class="card-header d-flex justify-content-between align-items-center">
                <div class="d-flex align-items-center gap-2">
                    <i class={classes!("bi", definition.icon)}></i>
                    <strong>{state.title_of(widget).to_string()}</strong>
                </div>
                <div class="d-flex gap-1">
                    {header_button("btn-outline-secondary", "bi-arrow-clockwise", "Atualizar", definition.id, &handlers.refresh)}
                    {if definition.configurable {
                        header_button("btn-outline-secondary", "bi-gear", "Configurar", definition.id, &handlers.configure)
                    } else {
                        html! {}
                    }}
                    {header_button("btn-outline-danger", "bi-x", "Remover", definition.id, &handlers.remove)}
                </div>
            </div>
            <div class="card-body overflow-auto">
                {widget_body(&widget.content, &widget.token)}
            </div>
        </div>
    }
}

fn render_library(
    open: bool,
    state: &DashboardState,
    library_open: &UseStateHandle<bool>,
    on_add: &Callback<&'static WidgetDefinition>,
) -> Html {
    let on_close = {
        let library_open = library_open.clone();
        Callback::from(move |()| library_open.set(false))
    };
    let title = html! { <><i class="bi bi-grid-3x3-gap me-2"></i>{"Biblioteca de Widgets"}</> };
    html! {
        <Modal {open} {title} size_class={classes!("modal-xl")} {on_close}>
            {for categories().into_iter().map(|category| html! {
                <div class="widget-category mb-4">
                    <h6 class="text-muted mb-3">{category.label()}</h6>
                    <div class="row g-3">
                        {for in_category(category).into_iter().map(|definition| {
                            let present = state.contains(definition.id);
                            let onclick = on_add.reform(move |_: MouseEvent| definition);
                            html! {
                                <div class="col-md-6 col-lg-4">
                                    <div class="widget-library-card card h-100 border-0 shadow-sm">
                                        <div class="card-body text-center">
                                            <i class={classes!("bi", definition.icon, "fs-2", "text-primary", "mb-3", "d-block")}></i>
                                            <h6 class="card-title">{definition.name}</h6>
                                            <p class="card-text small text-muted">{definition.description}</p>
                                            <button class="btn btn-primary btn-sm" disabled={present} {onclick}>
                                                <i class="bi bi-plus-lg me-1"></i>
                                                {if present { "Adicionado" } else { "Adicionar" }}
                                            </button>
                                        </div>
                                    </div>
                                </div>
                            }
                        })}
                    </div>
                </div>
            })}
        </Modal>
    }
}

fn render_settings(
    draft: &UseStateHandle<Option<(String, String)>>,
    state: &UseReducerHandle<DashboardState>,
) -> Html {
    let Some((id, title)) = (**draft).clone() else {
        return html! {};
    };
    let on_close = {
        let draft = draft.clone();
        Callback::from(move |()| draft.set(None))
    };
    let on_input = {
        let draft = draft.clone();
        let id = id.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            draft.set(Some((id.clone(), value)));
        })
    };
    let on_apply = {
        let draft = draft.clone();
        let state = state.clone();
        let id = id.clone();
        let title = title.clone();
        Callback::from(move |_| {
            let mut next = (*state).clone();
            next.set_title(&id, &title);
            save_preferences(&next);
            state.dispatch(DashboardAction::SetTitle {
                id: id.clone(),
                title: title.clone(),
            });
            draft.set(None);
        })
    };
    let footer = html! {
        <button type="button" class="btn btn-primary" onclick={on_apply}>{"Salvar"}</button>
    };
    let heading = html! { <><i class="bi bi-gear me-2"></i>{"Configurar widget"}</> };
    html! {
        <Modal open={true} title={heading} {footer} {on_close}>
            <label class="form-label">{"Título"}</label>
            <input type="text" class="form-control" value={title} oninput={on_input} />
            <small class="text-muted">{"Deixe em branco para usar o nome padrão."}</small>
        </Modal>
    }
}
