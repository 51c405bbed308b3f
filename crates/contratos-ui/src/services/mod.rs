//! Browser bindings: HTTP, storage, dialogs and the external JS libraries.

pub(crate) mod api;
pub(crate) mod charts;
pub(crate) mod clipboard;
pub(crate) mod dialogs;
pub(crate) mod download;
pub(crate) mod grid;
pub(crate) mod js;
pub(crate) mod page;
pub(crate) mod storage;
