//! Location helpers.

use gloo::console;
use gloo::timers::callback::Timeout;
use gloo::utils::window;

/// Current `location.pathname`.
pub(crate) fn current_path() -> String {
    window().location().pathname().unwrap_or_default()
}

/// Navigate to `url`.
pub(crate) fn navigate(url: &str) {
    if let Err(err) = window().location().set_href(url) {
        console::error!("navigation failed", url, err);
    }
}

/// Reload the page.
pub(crate) fn reload() {
    if let Err(err) = window().location().reload() {
        console::error!("reload failed", err);
    }
}

/// Reload after `millis`.
pub(crate) fn reload_after(millis: u32) {
    Timeout::new(millis, reload).forget();
}
