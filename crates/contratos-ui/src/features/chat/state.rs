//! Chat panel state owned by one component instance.
//!
//! # Design
//! - The reducer is the only owner of the transcript, search, edit and typing state.
//! - Temporary notices live in the transcript but never reach storage or exports.
//! - Ids are local and monotonic; they never leave the browser except in exports.

use contratos_api_models::{HistoryEntry, StoredMessage, StoredMessageKind};
use std::rc::Rc;
use yew::functional::Reducible;

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    /// Typed by the user.
    User,
    /// Produced by the assistant (or a local notice).
    Assistant,
}

/// One message on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Local id.
    pub id: u64,
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
    /// `HH:MM` label.
    pub time: String,
    /// Locally generated error notice.
    pub temporary: bool,
    /// Thumbs-up recorded.
    pub rated: bool,
}

impl ChatMessage {
    /// Storage/export shape.
    #[must_use]
    pub fn to_stored(&self) -> StoredMessage {
        StoredMessage {
            id: self.id,
            kind: match self.role {
                ChatRole::User => StoredMessageKind::User,
                ChatRole::Assistant => StoredMessageKind::Ai,
            },
            message: self.text.clone(),
            timestamp: self.time.clone(),
        }
    }
}

/// Inline edit in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditDraft {
    /// Message being edited.
    pub id: u64,
    /// Current textarea value.
    pub text: String,
}

/// Reducer input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatAction {
    /// Replace the transcript with server history.
    LoadHistory(Vec<HistoryEntry>),
    /// Replace the transcript with the local mirror.
    Restore(Vec<StoredMessage>),
    /// Append a user message.
    PushUser {
        /// Text sent.
        text: String,
        /// `HH:MM` label.
        time: String,
    },
    /// Append an assistant message or notice.
    PushAssistant {
        /// Reply text.
        text: String,
        /// `HH:MM` label.
        time: String,
        /// Local notice, never persisted.
        temporary: bool,
    },
    /// Toggle the typing indicator.
    SetTyping(bool),
    /// Update the search query.
    SetSearch(String),
    /// Drop every message.
    Clear,
    /// Open the inline editor for a user message.
    StartEdit(u64),
    /// Update the editor text.
    UpdateEdit(String),
    /// Commit the editor text.
    SaveEdit,
    /// Close the editor without changes.
    CancelEdit,
    /// Record a thumbs-up.
    Rate(u64),
}

/// Transcript and UI flags for one chat panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Messages in on-screen order.
    pub messages: Vec<ChatMessage>,
    /// Search query; empty shows everything.
    pub search: String,
    /// Inline edit in progress.
    pub editing: Option<EditDraft>,
    /// Waiting for the assistant.
    pub typing: bool,
    next_id: u64,
}

impl ChatState {
    /// Apply `action` in place.
    pub fn apply(&mut self, action: ChatAction) {
        match action {
            ChatAction::LoadHistory(entries) => {
                self.messages.clear();
                self.editing = None;
                for entry in entries {
                    let time = entry.time_label().unwrap_or_default().to_string();
                    self.push(ChatRole::User, entry.message, time.clone(), false);
                    if let Some(response) = entry.response.filter(|text| !text.is_empty()) {
                        self.push(ChatRole::Assistant, response, time, false);
                    }
                }
            }
            ChatAction::Restore(stored) => {
                self.messages.clear();
                self.editing = None;
                for message in stored {
                    let role = match message.kind {
                        StoredMessageKind::User => ChatRole::User,
                        StoredMessageKind::Ai => ChatRole::Assistant,
                    };
                    self.next_id = self.next_id.max(message.id);
                    self.messages.push(ChatMessage {
                        id: message.id,
                        role,
                        text: message.message,
                        time: message.timestamp,
                        temporary: false,
                        rated: false,
                    });
                }
            }
            ChatAction::PushUser { text, time } => self.push(ChatRole::User, text, time, false),
            ChatAction::PushAssistant {
                text,
                time,
                temporary,
            } => self.push(ChatRole::Assistant, text, time, temporary),
            ChatAction::SetTyping(typing) => self.typing = typing,
            ChatAction::SetSearch(query) => self.search = query,
            ChatAction::Clear => {
                self.messages.clear();
                self.editing = None;
            }
            ChatAction::StartEdit(id) => {
                self.editing = self
                    .messages
                    .iter()
                    .find(|message| message.id == id && message.role == ChatRole::User)
                    .map(|message| EditDraft {
                        id,
                        text: message.text.clone(),
                    });
            }
            ChatAction::UpdateEdit(text) => {
                if let Some(draft) = self.editing.as_mut() {
                    draft.text = text;
                }
            }
            ChatAction::SaveEdit => {
                if let Some(draft) = self.editing.take()
                    && let Some(message) = self.messages.iter_mut().find(|m| m.id == draft.id)
                {
                    message.text = draft.text;
                }
            }
            ChatAction::CancelEdit => self.editing = None,
            ChatAction::Rate(id) => {
                if let Some(message) = self
                    .messages
                    .iter_mut()
                    .find(|m| m.id == id && m.role == ChatRole::Assistant)
                {
                    message.rated = true;
                }
            }
        }
    }

    fn push(&mut self, role: ChatRole, text: String, time: String, temporary: bool) {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            text,
            time,
            temporary,
            rated: false,
        });
    }

    /// Messages matching the search query, case-insensitive.
    #[must_use]
    pub fn visible_messages(&self) -> Vec<&ChatMessage> {
        let query = self.search.to_lowercase();
        self.messages
            .iter()
            .filter(|message| query.is_empty() || message.text.to_lowercase().contains(&query))
            .collect()
    }

    /// Non-temporary messages in storage shape.
    #[must_use]
    pub fn stored_messages(&self) -> Vec<StoredMessage> {
        self.messages
            .iter()
            .filter(|message| !message.temporary)
            .map(ChatMessage::to_stored)
            .collect()
    }
}

impl Reducible for ChatState {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str, response: Option<&str>, timestamp: &str) -> HistoryEntry {
        HistoryEntry {
            message: message.into(),
            response: response.map(Into::into),
            timestamp: Some(timestamp.into()),
        }
    }

    fn user(state: &mut ChatState, text: &str) {
        state.apply(ChatAction::PushUser {
            text: text.into(),
            time: "10:00".into(),
        });
    }

    #[test]
    fn history_expands_into_user_and_assistant_messages() {
        let mut state = ChatState::default();
        state.apply(ChatAction::LoadHistory(vec![
            entry("oi", Some("olá"), "2024-05-01 14:32"),
            entry("sem resposta", None, "2024-05-01 14:40"),
        ]));
        let roles: Vec<ChatRole> = state.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        assert_eq!(state.messages[1].time, "14:32");
    }

    #[test]
    fn search_is_case_insensitive_and_empty_shows_all() {
        let mut state = ChatState::default();
        user(&mut state, "Contrato de LIMPEZA");
        user(&mut state, "empenho");
        state.apply(ChatAction::SetSearch("limpeza".into()));
        let visible: Vec<&str> = state
            .visible_messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(visible, vec!["Contrato de LIMPEZA"]);
        state.apply(ChatAction::SetSearch(String::new()));
        assert_eq!(state.visible_messages().len(), 2);
    }

    #[test]
    fn temporary_notices_are_not_stored() {
        let mut state = ChatState::default();
        user(&mut state, "oi");
        state.apply(ChatAction::PushAssistant {
            text: "erro".into(),
            time: "10:01".into(),
            temporary: true,
        });
        let stored = state.stored_messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].kind, StoredMessageKind::User);
    }

    #[test]
    fn edit_only_applies_to_user_messages_on_save() {
        let mut state = ChatState::default();
        user(&mut state, "original");
        state.apply(ChatAction::PushAssistant {
            text: "resposta".into(),
            time: "10:01".into(),
            temporary: false,
        });
        let user_id = state.messages[0].id;
        let assistant_id = state.messages[1].id;

        state.apply(ChatAction::StartEdit(assistant_id));
        assert!(state.editing.is_none());

        state.apply(ChatAction::StartEdit(user_id));
        state.apply(ChatAction::UpdateEdit("editado".into()));
        state.apply(ChatAction::CancelEdit);
        assert_eq!(state.messages[0].text, "original");

        state.apply(ChatAction::StartEdit(user_id));
        state.apply(ChatAction::UpdateEdit("editado".into()));
        state.apply(ChatAction::SaveEdit);
        assert_eq!(state.messages[0].text, "editado");
        assert!(state.editing.is_none());
    }

    #[test]
    fn restored_ids_keep_new_ids_unique() {
        let mut state = ChatState::default();
        state.apply(ChatAction::Restore(vec![StoredMessage {
            id: 41,
            kind: StoredMessageKind::Ai,
            message: "antigo".into(),
            timestamp: "09:00".into(),
        }]));
        user(&mut state, "novo");
        assert_eq!(state.messages[1].id, 42);
    }

    #[test]
    fn rating_marks_assistant_messages_only() {
        let mut state = ChatState::default();
        user(&mut state, "oi");
        let id = state.messages[0].id;
        state.apply(ChatAction::Rate(id));
        assert!(!state.messages[0].rated);
    }
}
