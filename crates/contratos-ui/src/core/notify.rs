//! Toast notifications shared by every mounted feature.
//!
//! # Design
//! - One yewdux store so all mount points feed a single toast host.
//! - Ids are monotonic; dismissal is by id so timers never remove a newer toast.

use yewdux::store::Store;

/// Visual tone of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Neutral information.
    Info,
    /// Completed action.
    Success,
    /// Failed action.
    Error,
}

impl ToastKind {
    /// CSS modifier for the toast host.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One visible toast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Store-assigned id.
    pub id: u64,
    /// Tone.
    pub kind: ToastKind,
    /// Message text.
    pub message: String,
}

/// Store slice holding the visible toasts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct ToastStore {
    /// Visible toasts, oldest first.
    pub toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastStore {
    /// Append a toast and return its id.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        id
    }

    /// Remove the toast with `id`, if still visible.
    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }
}

/// Push a toast onto the shared store.
pub fn notify(kind: ToastKind, message: impl Into<String>) {
    let message = message.into();
    yewdux::prelude::Dispatch::<ToastStore>::new().reduce_mut(move |store| {
        store.push(kind, message);
    });
}
