//! Chat panel component.
//!
//! # Design
//! - The panel owns its [`ChatState`] reducer; handlers receive state explicitly.
//! - Optional affordances render only when [`ChatFeatures`] enables them.
//! - The local mirror is written only after the initial history load settles.

use crate::core::config::ChatConfig;
use crate::core::notify::{ToastKind, notify};
use crate::core::prompt::Prompt;
use crate::core::storage::{CHAT_HISTORY_KEY, CHAT_STATS_KEY, load_json, save_json};
use crate::features::chat::api::{
    SendOutcome, SessionOutcome, delete_session, fetch_stats, load_history, new_session,
    send_message,
};
use crate::features::chat::features::ChatFeatures;
use crate::features::chat::logic::{
    CLEAR_CONFIRM, CONNECTION_ERROR_NOTICE, NO_SESSION_MESSAGE, NO_SESSION_SUGGESTION,
    PROCESSING_ERROR_NOTICE, SUGGESTIONS, Shortcut, bump_stats, clock_label, counter_label,
    counter_level, export_document, export_file_name, interpret_shortcut, record_session,
    regenerate_source, restorable_messages, session_id, session_page_url, stored_history,
    suggestion_prompt,
};
use crate::features::chat::markup::{Segment, parse};
use crate::features::chat::state::{ChatAction, ChatMessage, ChatRole, ChatState};
use crate::features::dashboard::charts::{ChartRegistry, chat_stats_config};
use crate::services::api::HttpClient;
use crate::services::charts::JsChart;
use crate::services::clipboard::copy_text;
use crate::services::dialogs::BrowserPrompt;
use crate::services::download::download_json;
use crate::services::page::{navigate, reload};
use crate::services::storage::{BrowserStore, log_storage_error};
use contratos_api_models::{ChatStats, Series, StoredHistory};
use gloo::console;
use gloo::events::EventListener;
use gloo::utils::document;
use js_sys::Date;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent};
use yew::platform::spawn_local;
use yew::prelude::*;

const STATS_CANVAS_ID: &str = "chat-stats-chart";

fn now_clock() -> String {
    let now = Date::new_0();
    clock_label(now.get_hours(), now.get_minutes())
}

fn now_iso() -> String {
    Date::new_0().to_iso_string().into()
}

fn update_stats(update: impl FnOnce(Option<ChatStats>, &str) -> ChatStats) {
    let current = load_json::<ChatStats>(&BrowserStore, CHAT_STATS_KEY).unwrap_or_else(|err| {
        log_storage_error("load", CHAT_STATS_KEY, &err.to_string());
        None
    });
    let next = update(current, &now_iso());
    if let Err(err) = save_json(&BrowserStore, CHAT_STATS_KEY, &next) {
        log_storage_error("set", CHAT_STATS_KEY, &err.to_string());
    }
}

fn restore_mirror(session: &str) -> Option<ChatAction> {
    let stored = load_json::<StoredHistory>(&BrowserStore, CHAT_HISTORY_KEY).unwrap_or_else(|err| {
        log_storage_error("load", CHAT_HISTORY_KEY, &err.to_string());
        None
    });
    restorable_messages(stored, session).map(ChatAction::Restore)
}

/// One resend request: the text and whether to echo it as a user message.
#[derive(Clone, PartialEq)]
struct Outgoing {
    text: String,
    echo: bool,
}

/// Props for [`ChatPanel`].
#[derive(Properties, PartialEq)]
pub struct ChatPanelProps {
    /// Page configuration.
    pub config: ChatConfig,
}

/// Chat panel for every page variant.
#[function_component(ChatPanel)]
pub fn chat_panel(props: &ChatPanelProps) -> Html {
    let config = use_memo(|config: &ChatConfig| config.clone(), props.config.clone());
    let features = config.features();
    let session = session_id(config.session_id.as_deref());
    let state = use_reducer(ChatState::default);
    let input = use_state(String::new);
    let hydrated = use_state(|| false);
    let stats_series = use_state(|| None::<Series>);
    let charts = use_mut_ref(ChartRegistry::<JsChart>::new);
    let messages_ref = use_node_ref();
    let search_ref = use_node_ref();

    {
        let config = config.clone();
        let session = session.clone();
        let dispatcher = state.dispatcher();
        let hydrated = hydrated.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let result =
                        load_history(&HttpClient::new(), &config, session.as_deref()).await;
                    let server = match result {
                        Ok(entries) => entries.filter(|entries| !entries.is_empty()),
                        Err(err) => {
                            console::error!("Erro ao carregar histórico:", err.to_string());
                            None
                        }
                    };
                    match (server, session) {
                        (Some(entries), _) => dispatcher.dispatch(ChatAction::LoadHistory(entries)),
                        (None, Some(session)) if features.history => {
                            if let Some(action) = restore_mirror(&session) {
                                dispatcher.dispatch(action);
                            }
                        }
                        (None, _) => {}
                    }
                    hydrated.set(true);
                });
                || ()
            },
            (),
        );
    }

    {
        let session = session.clone();
        use_effect_with_deps(
            move |(messages, hydrated): &(Vec<ChatMessage>, bool)| {
                if let (true, true, Some(session)) = (*hydrated, features.history, session) {
                    let stored: Vec<_> = messages
                        .iter()
                        .filter(|message| !message.temporary)
                        .map(ChatMessage::to_stored)
                        .collect();
                    let mirror = stored_history(&session, stored);
                    if let Err(err) = save_json(&BrowserStore, CHAT_HISTORY_KEY, &mirror) {
                        log_storage_error("set", CHAT_HISTORY_KEY, &err.to_string());
                    }
                }
                || ()
            },
            (state.messages.clone(), *hydrated),
        );
    }

    {
        let messages_ref = messages_ref.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(pane) = messages_ref.cast::<Element>() {
                    pane.set_scroll_top(pane.scroll_height());
                }
                || ()
            },
            (state.messages.len(), state.typing),
        );
    }

    {
        let config = config.clone();
        let session = session.clone();
        let stats_series = stats_series.clone();
        use_effect_with_deps(
            move |_| {
                if features.stats_chart {
                    spawn_local(async move {
                        match fetch_stats(&HttpClient::new(), &config, session.as_deref()).await {
                            Ok(series) => stats_series.set(series),
                            Err(err) => {
                                console::error!("Erro ao carregar estatísticas:", err.to_string());
                            }
                        }
                    });
                }
                || ()
            },
            (),
        );
    }

    {
        let charts = charts.clone();
        use_effect_with_deps(
            move |series: &Option<Series>| {
                if let Some(series) = series {
                    if JsChart::available() {
                        let result = charts.borrow_mut().replace_with(STATS_CANVAS_ID, || {
                            JsChart::create(STATS_CANVAS_ID, &chat_stats_config(series))
                        });
                        if let Err(err) = result {
                            console::error!("Erro ao criar gráfico:", err.to_string());
                        }
                    } else {
                        console::warn!("Chart.js não carregado; gráfico de estatísticas omitido");
                    }
                }
                move || charts.borrow_mut().clear()
            },
            (*stats_series).clone(),
        );
    }

    let send = {
        let config = config.clone();
        let session = session.clone();
        let dispatcher = state.dispatcher();
        let input = input.clone();
        Callback::from(move |outgoing: Outgoing| {
            let text = outgoing.text.trim().to_string();
            if text.is_empty() {
                return;
            }
            if session.is_none() {
                notify(ToastKind::Error, NO_SESSION_MESSAGE);
                return;
            }
            if outgoing.echo {
                dispatcher.dispatch(ChatAction::PushUser {
                    text: text.clone(),
                    time: now_clock(),
                });
                input.set(String::new());
            }
            dispatcher.dispatch(ChatAction::SetTyping(true));
            let config = config.clone();
            let session = session.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                let outcome =
                    send_message(&HttpClient::new(), &config, session.as_deref(), &text).await;
                dispatcher.dispatch(ChatAction::SetTyping(false));
                handle_send_outcome(&dispatcher, outcome);
            });
        })
    };

    let start_session = {
        let config = config.clone();
        Callback::from(move |_| {
            let config = config.clone();
            spawn_local(async move {
                match new_session(&HttpClient::new(), &config).await {
                    SessionOutcome::Redirect(target) => {
                        update_stats(record_session);
                        navigate(&target);
                    }
                    SessionOutcome::Failed(message) => BrowserPrompt.alert(&message),
                    SessionOutcome::NotConfigured => {
                        console::warn!("newSessionUrl não configurada");
                    }
                    SessionOutcome::Deleted | SessionOutcome::Cancelled => {}
                }
            });
        })
    };

    let remove_session = {
        let config = config.clone();
        Callback::from(move |target: String| {
            let config = config.clone();
            spawn_local(async move {
                match delete_session(&HttpClient::new(), &BrowserPrompt, &config, &target).await {
                    SessionOutcome::Deleted => reload(),
                    SessionOutcome::Failed(message) => BrowserPrompt.alert(&message),
                    SessionOutcome::NotConfigured => {
                        console::warn!("deleteSessionBaseUrl não configurada");
                    }
                    SessionOutcome::Redirect(_) | SessionOutcome::Cancelled => {}
                }
            });
        })
    };

    {
        let send = send.clone();
        let start_session = start_session.clone();
        let dispatcher = state.dispatcher();
        let search_ref = search_ref.clone();
        let current_input = (*input).clone();
        let search_active = !state.search.is_empty();
        use_effect_with_deps(
            move |_| {
                let listener = features.shortcuts.then(|| {
                    EventListener::new(&document(), "keydown", move |event| {
                        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        let ctrl = event.ctrl_key() || event.meta_key();
                        let Some(shortcut) = interpret_shortcut(&event.key(), ctrl, search_active)
                        else {
                            return;
                        };
                        event.prevent_default();
                        match shortcut {
                            Shortcut::Send => send.emit(Outgoing {
                                text: current_input.clone(),
                                echo: true,
                            }),
                            Shortcut::NewSession => start_session.emit(()),
                            Shortcut::FocusSearch => {
                                if let Some(search) = search_ref.cast::<HtmlElement>() {
                                    if let Err(err) = search.focus() {
                                        console::warn!("Falha ao focar a busca:", err);
                                    }
                                }
                            }
                            Shortcut::ClearSearch => {
                                dispatcher.dispatch(ChatAction::SetSearch(String::new()));
                            }
                        }
                    })
                });
                move || drop(listener)
            },
            ((*input).clone(), state.search.clone()),
        );
    }

    let on_submit = {
        let send = send.clone();
        let input = input.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            send.emit(Outgoing {
                text: (*input).clone(),
                echo: true,
            });
        })
    };

    let on_input = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            input.set(value);
        })
    };

    let on_search = {
        let dispatcher = state.dispatcher();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            dispatcher.dispatch(ChatAction::SetSearch(value));
        })
    };

    let on_clear = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_| {
            if BrowserPrompt.confirm(CLEAR_CONFIRM) {
                dispatcher.dispatch(ChatAction::Clear);
            }
        })
    };

    let on_export = {
        let state = state.clone();
        let session = session.clone();
        Callback::from(move |_| {
            let Some(session) = session.as_deref() else {
                return;
            };
            let export_date = now_iso();
            let document = export_document(session, state.stored_messages(), &export_date);
            let result = serde_json::to_string_pretty(&document)
                .map_err(anyhow::Error::from)
                .and_then(|encoded| {
                    download_json(&export_file_name(session, &export_date), &encoded)
                });
            if let Err(err) = result {
                console::error!("Erro ao exportar conversa:", err.to_string());
            }
        })
    };

    let on_suggestion = {
        let input = input.clone();
        let has_session = session.is_some();
        Callback::from(move |suggestion: &'static str| {
            if has_session {
                input.set(suggestion_prompt(suggestion));
            } else {
                notify(ToastKind::Error, NO_SESSION_SUGGESTION);
            }
        })
    };

    let actions = MessageActions {
        features,
        dispatcher: state.dispatcher(),
        resend: send.clone(),
        messages: Rc::new(state.messages.clone()),
    };

    let level = counter_level(input.chars().count());

    html! {
        <div class="chat-panel row g-0 h-100">
            {if features.history || !config.sessions.is_empty() {
                render_sidebar(&config, session.as_deref(), &start_session, &remove_session)
            } else {
                html! {}
            }}
            <div class="col d-flex flex-column h-100">
                <div class="chat-toolbar d-flex align-items-center gap-2 p-2 border-bottom">
                    {if features.search {
                        html! {
                            <input ref={search_ref} type="search" class="form-control form-control-sm"
                                placeholder="Buscar mensagens (Ctrl+K)"
                                value={state.search.clone()} oninput={on_search} />
                        }
                    } else {
                        html! {}
                    }}
                    {if features.clear {
                        html! {
                            <button class="btn btn-sm btn-outline-secondary" title="Limpar" onclick={on_clear}>
                                <i class="bi bi-trash"></i>
                            </button>
                        }
                    } else {
                        html! {}
                    }}
                    {if features.export && session.is_some() {
                        html! {
                            <button class="btn btn-sm btn-outline-secondary" title="Exportar" onclick={on_export}>
                                <i class="bi bi-download"></i>
                            </button>
                        }
                    } else {
                        html! {}
                    }}
                </div>
                {if features.stats_chart && stats_series.is_some() {
                    html! {
                        <div class="chat-stats p-2 border-bottom" style="height: 160px;">
                            <canvas id={STATS_CANVAS_ID}></canvas>
                        </div>
                    }
                } else {
                    html! {}
                }}
                <div ref={messages_ref} id="chatMessages" class="chat-messages flex-grow-1 overflow-auto p-3">
                    {if state.messages.is_empty() && features.suggestions {
                        render_suggestions(&on_suggestion)
                    } else {
                        html! {}
                    }}
                    {for state.visible_messages().into_iter().map(|message| render_message(message, &state, &actions))}
                    {if state.typing { render_typing() } else { html! {} }}
                </div>
                <form class="chat-input border-top p-2" onsubmit={on_submit}>
                    <div class="input-group">
                        <textarea class="form-control" rows="1" placeholder="Digite sua mensagem..."
                            value={(*input).clone()} oninput={on_input}></textarea>
                        <button type="submit" class="btn btn-primary" disabled={state.typing}>
                            <i class="bi bi-send"></i>
                        </button>
                    </div>
                    {if features.counter {
                        html! {
                            <small class={classes!("d-block", "text-end", level.class())}>{counter_label(&input)}</small>
                        }
                    } else {
                        html! {}
                    }}
                </form>
            </div>
        </div>
    }
}

fn handle_send_outcome(dispatcher: &UseReducerDispatcher<ChatState>, outcome: SendOutcome) {
    let notice = |text: &str| ChatAction::PushAssistant {
        text: text.to_string(),
        time: now_clock(),
        temporary: true,
    };
    match outcome {
        SendOutcome::Reply { text, time } => {
            dispatcher.dispatch(ChatAction::PushAssistant {
                text,
                time: time.unwrap_or_else(now_clock),
                temporary: false,
            });
            update_stats(bump_stats);
            notify(ToastKind::Success, "Mensagem enviada com sucesso!");
        }
        SendOutcome::Rejected => {
            dispatcher.dispatch(notice(PROCESSING_ERROR_NOTICE));
            notify(ToastKind::Error, "Erro ao processar mensagem");
        }
        SendOutcome::ConnectionFailed(err) => {
            console::error!("Erro ao enviar mensagem:", err.to_string());
            dispatcher.dispatch(notice(CONNECTION_ERROR_NOTICE));
            notify(ToastKind::Error, "Erro de conexão");
        }
        SendOutcome::NoSession => notify(ToastKind::Error, NO_SESSION_MESSAGE),
        SendOutcome::NotConfigured => console::warn!("sendUrl não configurada"),
    }
}

/// Handlers shared by every rendered message.
struct MessageActions {
    features: ChatFeatures,
    dispatcher: UseReducerDispatcher<ChatState>,
    resend: Callback<Outgoing>,
    messages: Rc<Vec<ChatMessage>>,
}

fn icon_button(title: &'static str, icon: &'static str, onclick: Callback<MouseEvent>) -> Html {
    html! {
        <button type="button" class="btn btn-sm btn-link text-muted p-0 ms-2" {title} {onclick}>
            <i class={classes!("bi", icon)}></i>
        </button>
    }
}

fn render_message(message: &ChatMessage, state: &ChatState, actions: &MessageActions) -> Html {
    let features = actions.features;
    let id = message.id;
    let mut buttons = Vec::new();
    if features.copy && !message.temporary {
        let text = message.text.clone();
        buttons.push(icon_button(
            "Copiar",
            "bi-clipboard",
            Callback::from(move |_| {
                let text = text.clone();
                spawn_local(async move {
                    match copy_text(&text).await {
                        Ok(()) => notify(ToastKind::Success, "Mensagem copiada!"),
                        Err(err) => {
                            console::error!("Erro ao copiar:", err.to_string());
                            notify(ToastKind::Error, "Erro ao copiar mensagem");
                        }
                    }
                });
            }),
        ));
    }
    match message.role {
        ChatRole::User if features.edit => {
            let dispatcher = actions.dispatcher.clone();
            buttons.push(icon_button(
                "Editar",
                "bi-pencil",
                Callback::from(move |_| dispatcher.dispatch(ChatAction::StartEdit(id))),
            ));
        }
        ChatRole::Assistant if !message.temporary => {
            if features.rate {
                let dispatcher = actions.dispatcher.clone();
                let icon = if message.rated {
                    "bi-hand-thumbs-up-fill"
                } else {
                    "bi-hand-thumbs-up"
                };
                buttons.push(icon_button(
                    "Avaliar",
                    icon,
                    Callback::from(move |_| {
                        dispatcher.dispatch(ChatAction::Rate(id));
                        notify(ToastKind::Success, "Avaliação registrada!");
                    }),
                ));
            }
            if features.regenerate {
                let resend = actions.resend.clone();
                let messages = actions.messages.clone();
                buttons.push(icon_button(
                    "Regenerar",
                    "bi-arrow-clockwise",
                    Callback::from(move |_| {
                        if let Some(text) = regenerate_source(&messages, id) {
                            notify(ToastKind::Info, "Regenerando resposta...");
                            resend.emit(Outgoing { text, echo: false });
                        }
                    }),
                ));
            }
        }
        ChatRole::User | ChatRole::Assistant => {}
    }

    let editing = state.editing.as_ref().filter(|draft| draft.id == id);
    let body = match editing {
        Some(draft) => render_editor(&draft.text, &actions.dispatcher),
        None => match message.role {
            ChatRole::User => html! { <div class="message-text">{message.text.clone()}</div> },
            ChatRole::Assistant => html! {
                <div class="message-text">{for parse(&message.text).into_iter().map(render_segment)}</div>
            },
        },
    };
    let meta = html! {
        <div class={classes!("message-meta", "mt-1", (message.role == ChatRole::User).then_some("text-end"))}>
            <small class="text-muted">{message.time.clone()}</small>
            {for buttons}
        </div>
    };

    match message.role {
        ChatRole::User => html! {
            <div class="message user-message mb-3" data-message-id={id.to_string()}>
                <div class="d-flex justify-content-end">
                    <div class="message-content" style="max-width: 70%;">
                        <div class="bg-primary text-white p-3 rounded-3 shadow-sm">{body}</div>
                        {meta}
                    </div>
                </div>
            </div>
        },
        ChatRole::Assistant => html! {
            <div class={classes!("message", "ai-message", "mb-3", message.temporary.then_some("temporary"))} data-message-id={id.to_string()}>
                <div class="d-flex">
                    {render_avatar()}
                    <div class="message-content flex-grow-1" style="max-width: 70%;">
                        <div class="bg-light border p-3 rounded-3 shadow-sm">{body}</div>
                        {meta}
                    </div>
                </div>
            </div>
        },
    }
}

fn render_editor(text: &str, dispatcher: &UseReducerDispatcher<ChatState>) -> Html {
    let on_input = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlTextAreaElement>().value();
            dispatcher.dispatch(ChatAction::UpdateEdit(value));
        })
    };
    let on_save = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |_| {
            dispatcher.dispatch(ChatAction::SaveEdit);
            notify(ToastKind::Success, "Mensagem editada!");
        })
    };
    let on_cancel = {
        let dispatcher = dispatcher.clone();
        Callback::from(move |_| dispatcher.dispatch(ChatAction::CancelEdit))
    };
    html! {
        <div class="message-editor">
            <textarea class="form-control form-control-sm mb-2" value={text.to_string()} oninput={on_input}></textarea>
            <button type="button" class="btn btn-sm btn-light me-1" onclick={on_save}>{"Salvar"}</button>
            <button type="button" class="btn btn-sm btn-outline-light" onclick={on_cancel}>{"Cancelar"}</button>
        </div>
    }
}

fn render_segment(segment: Segment) -> Html {
    match segment {
        Segment::Text(text) => html! { {text} },
        Segment::Bold(text) => html! { <strong>{text}</strong> },
        Segment::Italic(text) => html! { <em>{text}</em> },
        Segment::Code(text) => html! { <code>{text}</code> },
        Segment::Link(url) => html! {
            <a href={url.clone()} target="_blank" rel="noopener noreferrer">{url}</a>
        },
        Segment::LineBreak => html! { <br /> },
    }
}

fn render_avatar() -> Html {
    html! {
        <div class="avatar-container me-2">
            <div class="bg-success rounded-circle d-flex align-items-center justify-content-center" style="width: 32px; height: 32px;">
                <i class="bi bi-robot text-white"></i>
            </div>
        </div>
    }
}

fn render_typing() -> Html {
    html! {
        <div class="typing-indicator mb-3">
            <div class="d-flex">
                {render_avatar()}
                <div class="typing-dots bg-light border p-3 rounded-3">
                    <span class="dot"></span>
                    <span class="dot"></span>
                    <span class="dot"></span>
                </div>
            </div>
        </div>
    }
}

fn render_suggestions(on_suggestion: &Callback<&'static str>) -> Html {
    html! {
        <div class="row g-2 mb-3">
            {for SUGGESTIONS.into_iter().map(|suggestion| {
                let onclick = on_suggestion.reform(move |_: MouseEvent| suggestion);
                html! {
                    <div class="col-md-6">
                        <div class="card suggestion-card h-100" role="button" {onclick}>
                            <div class="card-body py-2">{suggestion}</div>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}

fn render_sidebar(
    config: &ChatConfig,
    active: Option<&str>,
    start_session: &Callback<()>,
    remove_session: &Callback<String>,
) -> Html {
    let on_new = start_session.reform(|_: MouseEvent| ());
    html! {
        <div class="col-md-3 chat-sidebar border-end h-100 overflow-auto p-2">
            <button class="btn btn-primary btn-sm w-100 mb-2" onclick={on_new}>
                <i class="bi bi-plus-lg me-1"></i>{"Nova conversa"}
            </button>
            <div class="list-group list-group-flush">
                {for config.sessions.iter().map(|link| {
                    let is_active = active == Some(link.id.as_str());
                    let id = link.id.clone();
                    let on_delete = remove_session.reform(move |event: MouseEvent| {
                        event.prevent_default();
                        event.stop_propagation();
                        id.clone()
                    });
                    html! {
                        <a href={session_page_url(&link.id)}
                            class={classes!("list-group-item", "list-group-item-action", "d-flex", "justify-content-between", "align-items-center", is_active.then_some("active"))}>
                            <span class="text-truncate">{link.title.clone()}</span>
                            <button type="button" class="btn btn-sm btn-link text-danger p-0" title="Excluir conversa" onclick={on_delete}>
                                <i class="bi bi-x-lg"></i>
                            </button>
                        </a>
                    }
                })}
            </div>
        </div>
    }
}
