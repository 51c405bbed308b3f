//! Blocking confirm/alert seam.
//!
//! Controllers ask for confirmation through [`Prompt`] so destructive flows can
//! be exercised without a browser.

/// Modal confirm/alert dialogs.
pub trait Prompt {
    /// Ask a yes/no question; `true` means the user accepted.
    fn confirm(&self, message: &str) -> bool;
    /// Show a blocking notice.
    fn alert(&self, message: &str);
}
