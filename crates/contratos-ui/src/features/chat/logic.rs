//! Pure chat helpers: session guard, counter, shortcuts, export and stats.

use crate::features::chat::state::{ChatMessage, ChatRole};
use contratos_api_models::{ChatExport, ChatStats, StoredHistory, StoredMessage};

/// Hard limit shown by the counter.
pub const MAX_MESSAGE_CHARS: usize = 2000;
/// Counter turns to a warning above this length.
pub const WARN_MESSAGE_CHARS: usize = 1800;

/// Toast shown when sending without a session.
pub const NO_SESSION_MESSAGE: &str = "Crie ou selecione uma conversa antes de enviar.";
/// Toast shown when a suggestion is picked without a session.
pub const NO_SESSION_SUGGESTION: &str = "Crie uma nova conversa primeiro!";
/// Notice appended when the assistant answers `success: false`.
pub const PROCESSING_ERROR_NOTICE: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Tente novamente.";
/// Notice appended when the request fails.
pub const CONNECTION_ERROR_NOTICE: &str =
    "❌ Erro de conexão. Verifique sua internet e tente novamente.";
/// Confirmation before deleting a session.
pub const DELETE_SESSION_CONFIRM: &str = "Tem certeza que deseja deletar esta conversa?";
/// Confirmation before clearing the transcript.
pub const CLEAR_CONFIRM: &str = "Tem certeza que deseja limpar todas as mensagens desta conversa?";
/// Prefix used by suggestion cards.
pub const SUGGESTION_PREFIX: &str = "Me ajude com: ";

/// A session exists iff the id is non-empty and not the literal `undefined`.
#[must_use]
pub fn is_valid_session(id: Option<&str>) -> bool {
    id.map(str::trim)
        .is_some_and(|id| !id.is_empty() && id != "undefined")
}

/// Normalized session id, `None` when [`is_valid_session`] fails.
#[must_use]
pub fn session_id(id: Option<&str>) -> Option<String> {
    is_valid_session(id).then(|| id.unwrap_or_default().trim().to_string())
}

/// Visual level of the character counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterLevel {
    /// Within limits.
    Normal,
    /// Close to the limit.
    Warning,
    /// Over the limit.
    Danger,
}

impl CounterLevel {
    /// CSS class for the counter element.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Normal => "text-muted",
            Self::Warning => "text-warning",
            Self::Danger => "text-danger",
        }
    }
}

/// Counter level for a message of `chars` characters.
#[must_use]
pub const fn counter_level(chars: usize) -> CounterLevel {
    if chars > MAX_MESSAGE_CHARS {
        CounterLevel::Danger
    } else if chars > WARN_MESSAGE_CHARS {
        CounterLevel::Warning
    } else {
        CounterLevel::Normal
    }
}

/// `n/2000` label.
#[must_use]
pub fn counter_label(text: &str) -> String {
    format!("{}/{MAX_MESSAGE_CHARS}", text.chars().count())
}

/// Keyboard shortcut recognised by the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+Enter.
    Send,
    /// Ctrl+N.
    NewSession,
    /// Ctrl+K.
    FocusSearch,
    /// Escape with a non-empty search.
    ClearSearch,
}

/// Map a key press to a shortcut.
#[must_use]
pub fn interpret_shortcut(key: &str, ctrl: bool, search_active: bool) -> Option<Shortcut> {
    match (ctrl, key) {
        (true, "Enter") => Some(Shortcut::Send),
        (true, "n" | "N") => Some(Shortcut::NewSession),
        (true, "k" | "K") => Some(Shortcut::FocusSearch),
        (_, "Escape") if search_active => Some(Shortcut::ClearSearch),
        _ => None,
    }
}

/// Suggestion cards shown on an empty transcript.
pub const SUGGESTIONS: [&str; 4] = [
    "Contratos vencendo nos próximos 30 dias",
    "Resumo dos empenhos do mês",
    "Principais fornecedores por valor",
    "Alertas de prazos e atrasos",
];

/// Input text for a suggestion card.
#[must_use]
pub fn suggestion_prompt(suggestion: &str) -> String {
    format!("{SUGGESTION_PREFIX}{}", suggestion.trim())
}

/// `HH:MM` label.
#[must_use]
pub fn clock_label(hours: u32, minutes: u32) -> String {
    format!("{hours:02}:{minutes:02}")
}

/// Export document for the current transcript.
#[must_use]
pub fn export_document(
    session_id: &str,
    messages: Vec<StoredMessage>,
    export_date: &str,
) -> ChatExport {
    ChatExport {
        session_id: session_id.to_string(),
        messages,
        export_date: export_date.to_string(),
    }
}

/// `chat_export_{session}_{yyyy-mm-dd}.json`.
#[must_use]
pub fn export_file_name(session_id: &str, export_date: &str) -> String {
    let day = export_date.split('T').next().unwrap_or(export_date);
    format!("chat_export_{session_id}_{day}.json")
}

/// Counters after one answered message.
#[must_use]
pub fn bump_stats(stats: Option<ChatStats>, now: &str) -> ChatStats {
    let mut stats = stats.unwrap_or_default();
    stats.messages_count += 1;
    stats.last_activity = Some(now.to_string());
    stats
}

/// Counters after creating a session.
#[must_use]
pub fn record_session(stats: Option<ChatStats>, now: &str) -> ChatStats {
    let mut stats = stats.unwrap_or_default();
    stats.sessions_count += 1;
    stats.last_activity = Some(now.to_string());
    stats
}

/// Text of the closest user message before `assistant_id`.
#[must_use]
pub fn regenerate_source(messages: &[ChatMessage], assistant_id: u64) -> Option<String> {
    let position = messages
        .iter()
        .position(|message| message.id == assistant_id && message.role == ChatRole::Assistant)?;
    messages[..position]
        .iter()
        .rev()
        .find(|message| message.role == ChatRole::User)
        .map(|message| message.text.clone())
}

/// Local mirror for `session_id`.
#[must_use]
pub fn stored_history(session_id: &str, messages: Vec<StoredMessage>) -> StoredHistory {
    StoredHistory {
        session_id: session_id.to_string(),
        messages,
    }
}

/// Mirrored messages when they belong to `session_id`.
#[must_use]
pub fn restorable_messages(
    stored: Option<StoredHistory>,
    session_id: &str,
) -> Option<Vec<StoredMessage>> {
    stored
        .filter(|history| history.session_id == session_id && !history.messages.is_empty())
        .map(|history| history.messages)
}

/// Sidebar link for another session.
#[must_use]
pub fn session_page_url(session_id: &str) -> String {
    format!("/chat/?session_id={}", urlencoding::encode(session_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contratos_api_models::StoredMessageKind;

    fn message(id: u64, role: ChatRole, text: &str) -> ChatMessage {
        ChatMessage {
            id,
            role,
            text: text.into(),
            time: "10:00".into(),
            temporary: false,
            rated: false,
        }
    }

    #[test]
    fn session_guard_rejects_blank_and_undefined() {
        assert!(!is_valid_session(None));
        assert!(!is_valid_session(Some("")));
        assert!(!is_valid_session(Some("  ")));
        assert!(!is_valid_session(Some("undefined")));
        assert!(is_valid_session(Some("abc")));
        assert_eq!(session_id(Some(" abc ")).as_deref(), Some("abc"));
    }

    #[test]
    fn counter_levels_follow_thresholds() {
        assert_eq!(counter_level(1800), CounterLevel::Normal);
        assert_eq!(counter_level(1801), CounterLevel::Warning);
        assert_eq!(counter_level(2000), CounterLevel::Warning);
        assert_eq!(counter_level(2001), CounterLevel::Danger);
        assert_eq!(counter_label("ação"), "4/2000");
    }

    #[test]
    fn shortcuts_map_keys() {
        assert_eq!(
            interpret_shortcut("Enter", true, false),
            Some(Shortcut::Send)
        );
        assert_eq!(interpret_shortcut("Enter", false, false), None);
        assert_eq!(
            interpret_shortcut("n", true, false),
            Some(Shortcut::NewSession)
        );
        assert_eq!(
            interpret_shortcut("k", true, false),
            Some(Shortcut::FocusSearch)
        );
        assert_eq!(
            interpret_shortcut("Escape", false, true),
            Some(Shortcut::ClearSearch)
        );
        assert_eq!(interpret_shortcut("Escape", false, false), None);
    }

    #[test]
    fn suggestion_uses_prefix() {
        assert_eq!(
            suggestion_prompt("  contratos vencendo "),
            "Me ajude com: contratos vencendo"
        );
    }

    #[test]
    fn export_name_uses_date_part() {
        assert_eq!(
            export_file_name("s1", "2024-05-01T12:30:00.000Z"),
            "chat_export_s1_2024-05-01.json"
        );
        let doc = export_document("s1", Vec::new(), "2024-05-01T12:30:00.000Z");
        assert_eq!(doc.session_id, "s1");
    }

    #[test]
    fn export_keeps_on_screen_order_without_notices() {
        use crate::features::chat::state::{ChatAction, ChatState};

        let mut state = ChatState::default();
        let assistant = |text: &str, temporary| ChatAction::PushAssistant {
            text: text.into(),
            time: "10:01".into(),
            temporary,
        };
        state.apply(ChatAction::PushUser {
            text: "primeira".into(),
            time: "10:00".into(),
        });
        state.apply(assistant("resposta", false));
        state.apply(ChatAction::PushUser {
            text: "segunda".into(),
            time: "10:02".into(),
        });
        state.apply(assistant("Erro de conexão", true));
        state.apply(assistant("outra resposta", false));

        let doc = export_document("s1", state.stored_messages(), "2024-05-01T12:30:00.000Z");
        let exported: Vec<(StoredMessageKind, &str)> = doc
            .messages
            .iter()
            .map(|message| (message.kind, message.message.as_str()))
            .collect();
        assert_eq!(
            exported,
            vec![
                (StoredMessageKind::User, "primeira"),
                (StoredMessageKind::Ai, "resposta"),
                (StoredMessageKind::User, "segunda"),
                (StoredMessageKind::Ai, "outra resposta"),
            ]
        );
    }

    #[test]
    fn stats_increment_from_missing_blob() {
        let stats = bump_stats(None, "2024-05-01T10:00:00Z");
        assert_eq!(stats.messages_count, 1);
        let stats = bump_stats(Some(stats), "2024-05-01T11:00:00Z");
        assert_eq!(stats.messages_count, 2);
        assert_eq!(stats.last_activity.as_deref(), Some("2024-05-01T11:00:00Z"));
        assert_eq!(record_session(Some(stats), "x").sessions_count, 1);
    }

    #[test]
    fn regenerate_picks_closest_preceding_user_message() {
        let messages = vec![
            message(1, ChatRole::User, "primeira"),
            message(2, ChatRole::Assistant, "r1"),
            message(3, ChatRole::User, "segunda"),
            message(4, ChatRole::Assistant, "aviso"),
            message(5, ChatRole::Assistant, "r2"),
        ];
        assert_eq!(regenerate_source(&messages, 5).as_deref(), Some("segunda"));
        assert_eq!(regenerate_source(&messages, 2).as_deref(), Some("primeira"));
        assert_eq!(regenerate_source(&messages, 1), None);
        assert_eq!(regenerate_source(&messages[1..2], 2), None);
    }

    #[test]
    fn history_restores_only_for_matching_session() {
        let stored = stored_history(
            "s1",
            vec![StoredMessage {
                id: 1,
                kind: StoredMessageKind::User,
                message: "oi".into(),
                timestamp: "10:00".into(),
            }],
        );
        assert!(restorable_messages(Some(stored.clone()), "s2").is_none());
        assert_eq!(
            restorable_messages(Some(stored), "s1").map(|m| m.len()),
            Some(1)
        );
    }

    #[test]
    fn session_links_are_encoded() {
        assert_eq!(session_page_url("a b"), "/chat/?session_id=a%20b");
    }
}
