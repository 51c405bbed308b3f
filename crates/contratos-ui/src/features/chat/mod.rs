//! Assistant chat panel.
//!
//! # Design
//! - One component covers every page variant; [`features::ChatFeatures`] toggles
//!   the optional affordances.
//! - State is owned by the component's reducer, never by module globals.

pub mod api;
pub mod features;
pub mod logic;
pub mod markup;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
