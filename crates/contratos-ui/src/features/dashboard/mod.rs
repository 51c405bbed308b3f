//! Drag-and-drop widget dashboard.
//!
//! # Design
//! - The widget set, packer, chart registry and payload decoding are DOM-free.
//! - GridStack and Chart.js are optional page globals; without GridStack the
//!   grid falls back to static CSS placement.

pub mod charts;
pub mod layout;
pub mod registry;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
#[cfg(target_arch = "wasm32")]
mod widget_view;
pub mod widgets;
