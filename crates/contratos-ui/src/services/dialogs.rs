//! Native `confirm`/`alert` dialogs.

use crate::core::prompt::Prompt;
use gloo::dialogs;

/// Browser dialogs.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserPrompt;

impl Prompt for BrowserPrompt {
    fn confirm(&self, message: &str) -> bool {
        dialogs::confirm(message)
    }

    fn alert(&self, message: &str) {
        dialogs::alert(message);
    }
}
