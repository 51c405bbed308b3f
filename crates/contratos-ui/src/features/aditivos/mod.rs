//! Contract amendment ("aditivo") modal.
//!
//! # Design
//! - The modal is opened from server-rendered pages through a JS export.
//! - List, create and delete go through [`api::AditivosBackend`].

pub mod api;
pub mod logic;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
