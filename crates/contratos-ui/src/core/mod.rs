//! Core, DOM-free primitives shared by every feature.
pub mod config;
pub mod error;
pub mod format;
pub mod notify;
pub mod prompt;
pub mod storage;
