//! Shared presentational components.

pub(crate) mod empty_state;
pub(crate) mod modal;
pub(crate) mod toast;
