//! Bootstrap-styled modal shell.
//!
//! # Design
//! - Visibility is prop-driven; the parent owns the open flag.
//! - The backdrop and the header close button both emit `on_close`.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    pub(crate) open: bool,
    pub(crate) title: Html,
    #[prop_or_default]
    pub(crate) size_class: Classes,
    #[prop_or_default]
    pub(crate) footer: Option<Html>,
    #[prop_or_default]
    pub(crate) children: Children,
    #[prop_or_default]
    pub(crate) on_close: Callback<()>,
}

#[function_component(Modal)]
pub(crate) fn modal(props: &ModalProps) -> Html {
    if !props.open {
        return html! {};
    }
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    html! {
        <>
            <div class="modal fade show d-block" tabindex="-1" role="dialog" aria-modal="true">
                <div class={classes!("modal-dialog", "modal-dialog-scrollable", props.size_class.clone())}>
                    <div class="modal-content">
                        <div class="modal-header">
                            <h5 class="modal-title">{props.title.clone()}</h5>
                            <button type="button" class="btn-close" aria-label="Fechar" onclick={close.clone()}></button>
                        </div>
                        <div class="modal-body">
                            { for props.children.iter() }
                        </div>
                        {props.footer.clone().map(|footer| html! {
                            <div class="modal-footer">{footer}</div>
                        }).unwrap_or_default()}
                    </div>
                </div>
            </div>
            <div class="modal-backdrop fade show" onclick={close}></div>
        </>
    }
}
