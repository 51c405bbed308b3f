//! Muted placeholder for empty or failed lists.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct EmptyStateProps {
    pub(crate) message: AttrValue,
    #[prop_or_default]
    pub(crate) icon: Option<AttrValue>,
    #[prop_or_default]
    pub(crate) class: Classes,
}

#[function_component(EmptyState)]
pub(crate) fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class={classes!("text-muted", "text-center", props.class.clone())}>
            {props.icon.clone().map(|icon| html! {
                <i class={classes!("bi", icon.to_string(), "me-2")}></i>
            }).unwrap_or_default()}
            {props.message.clone()}
        </div>
    }
}
