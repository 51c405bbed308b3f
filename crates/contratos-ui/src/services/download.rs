//! File downloads through a temporary anchor.

use anyhow::anyhow;
use gloo::file::{Blob, ObjectUrl};
use gloo::timers::callback::Timeout;
use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

/// Offer `contents` as a JSON file named `file_name`.
pub(crate) fn download_json(file_name: &str, contents: &str) -> anyhow::Result<()> {
    let blob = Blob::new_with_options(contents, Some("application/json"));
    let url = ObjectUrl::from(blob);
    let anchor: HtmlAnchorElement = document()
        .create_element("a")
        .map_err(|err| anyhow!("create anchor: {err:?}"))?
        .dyn_into()
        .map_err(|_| anyhow!("anchor cast failed"))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Timeout::new(1_000, move || drop(url)).forget();
    Ok(())
}
