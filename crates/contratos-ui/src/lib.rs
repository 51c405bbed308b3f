#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Contratos web UI.
//!
//! Yew front-end for the contract management pages: the aditivos modal, the
//! assistant chat panel and the drag-and-drop dashboard. Everything under
//! [`core`] and the `state`/`logic`/`api` modules of each feature is DOM-free
//! and tested natively; views, browser services and the mount logic only build
//! for `wasm32`.

pub mod core;
pub mod features;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::{open_aditivos_modal, run_app};

#[cfg(test)]
pub(crate) mod testing;
