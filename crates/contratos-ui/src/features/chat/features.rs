//! Optional chat affordances and the presets that enable them.

use serde::Deserialize;

/// Preset selected by the page's `CHAT_CONFIG.variant`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatVariant {
    /// Every affordance.
    #[default]
    Full,
    /// Plain send/receive with history.
    Minimal,
    /// Analytics page: search, export, suggestions and the stats chart.
    Insights,
}

/// Flags for each optional affordance of the chat panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ChatFeatures {
    /// Copy a message to the clipboard.
    pub copy: bool,
    /// Inline edit of user messages.
    pub edit: bool,
    /// Thumbs-up on assistant messages.
    pub rate: bool,
    /// Resend the closest preceding user message.
    pub regenerate: bool,
    /// Filter messages by text.
    pub search: bool,
    /// Remove every message after confirmation.
    pub clear: bool,
    /// Download the transcript as JSON.
    pub export: bool,
    /// Keyboard shortcuts.
    pub shortcuts: bool,
    /// Suggestion cards.
    pub suggestions: bool,
    /// `n/2000` counter.
    pub counter: bool,
    /// Messages-per-day chart.
    pub stats_chart: bool,
    /// Mirror the transcript to local storage.
    pub history: bool,
}

impl ChatFeatures {
    /// Flags for `variant`.
    #[must_use]
    pub const fn for_variant(variant: ChatVariant) -> Self {
        match variant {
            ChatVariant::Full => Self {
                copy: true,
                edit: true,
                rate: true,
                regenerate: true,
                search: true,
                clear: true,
                export: true,
                shortcuts: true,
                suggestions: true,
                counter: true,
                stats_chart: false,
                history: true,
            },
            ChatVariant::Minimal => Self {
                copy: false,
                edit: false,
                rate: false,
                regenerate: false,
                search: false,
                clear: false,
                export: false,
                shortcuts: false,
                suggestions: false,
                counter: false,
                stats_chart: false,
                history: false,
            },
            ChatVariant::Insights => Self {
                copy: true,
                edit: false,
                rate: false,
                regenerate: false,
                search: true,
                clear: false,
                export: true,
                shortcuts: true,
                suggestions: true,
                counter: true,
                stats_chart: true,
                history: true,
            },
        }
    }
}

impl Default for ChatFeatures {
    fn default() -> Self {
        Self::for_variant(ChatVariant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_disables_every_affordance() {
        let minimal = ChatFeatures::for_variant(ChatVariant::Minimal);
        assert!(!minimal.search && !minimal.export && !minimal.shortcuts);
        assert!(!minimal.history);
    }

    #[test]
    fn only_insights_draws_the_stats_chart() {
        assert!(ChatFeatures::for_variant(ChatVariant::Insights).stats_chart);
        assert!(!ChatFeatures::default().stats_chart);
        assert!(ChatFeatures::default().edit);
    }
}
