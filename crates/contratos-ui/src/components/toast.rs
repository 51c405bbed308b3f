//! Toast host fed by the shared [`ToastStore`].

use crate::core::notify::{Toast, ToastKind, ToastStore};
use gloo::timers::callback::Timeout;
use yew::prelude::*;
use yewdux::prelude::use_store;

const TOAST_LIFETIME_MS: u32 = 4_000;

#[function_component(ToastHost)]
pub(crate) fn toast_host() -> Html {
    let (store, dispatch) = use_store::<ToastStore>();
    let on_dismiss = dispatch.reduce_mut_callback_with(|store, id: u64| store.dismiss(id));
    {
        let on_dismiss = on_dismiss.clone();
        use_effect_with_deps(
            move |list: &Vec<Toast>| {
                let mut handles = Vec::new();
                for toast in list {
                    let on_dismiss = on_dismiss.clone();
                    let id = toast.id;
                    handles.push(Timeout::new(TOAST_LIFETIME_MS, move || on_dismiss.emit(id)));
                }
                move || drop(handles)
            },
            store.toasts.clone(),
        );
    }

    html! {
        <div class="toast-container position-fixed top-0 end-0 p-3" aria-live="polite" aria-atomic="true">
            {for store.toasts.iter().map(|toast| render_toast(toast, on_dismiss.clone()))}
        </div>
    }
}

fn render_toast(toast: &Toast, on_dismiss: Callback<u64>) -> Html {
    let tone = match toast.kind {
        ToastKind::Info => "bg-info",
        ToastKind::Success => "bg-success",
        ToastKind::Error => "bg-danger",
    };
    let id = toast.id;
    let on_close = Callback::from(move |_| on_dismiss.emit(id));

    html! {
        <div class={classes!("toast", "show", "align-items-center", "text-white", "border-0", tone, toast.kind.class())} role="alert">
            <div class="d-flex">
                <div class="toast-body">{toast.message.clone()}</div>
                <button type="button" class="btn-close btn-close-white me-2 m-auto" aria-label="Fechar" onclick={on_close}></button>
            </div>
        </div>
    }
}
