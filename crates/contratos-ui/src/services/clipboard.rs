//! Async clipboard writes.

use anyhow::anyhow;
use gloo::utils::window;
use wasm_bindgen_futures::JsFuture;

/// Copy `text` with `navigator.clipboard.writeText`.
pub(crate) async fn copy_text(text: &str) -> anyhow::Result<()> {
    let promise = window().navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map_err(|err| anyhow!("clipboard write failed: {err:?}"))?;
    Ok(())
}
