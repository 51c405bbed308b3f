//! Chat backend seam and the request flows built on it.
//!
//! # Design
//! - Every flow checks the session guard and its configured URL before any request.
//! - Flows return outcomes; the view decides how to surface them.
//! - Destructive flows confirm through [`Prompt`] first.

use crate::core::config::ChatConfig;
use crate::core::error::UiError;
use crate::core::prompt::Prompt;
use crate::features::chat::logic::{DELETE_SESSION_CONFIRM, is_valid_session};
use async_trait::async_trait;
use contratos_api_models::{
    ApiOutcome, ChatStatsSeries, HistoryEntry, HistoryResponse, NewSessionResponse, Series,
    SendMessageRequest, SendMessageResponse,
};

/// Chat endpoints.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// `GET` the message list.
    async fn history(&self, url: &str) -> Result<HistoryResponse, UiError>;
    /// `POST` one user message.
    async fn send_message(
        &self,
        url: &str,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, UiError>;
    /// `POST` to create a session.
    async fn create_session(&self, url: &str) -> Result<NewSessionResponse, UiError>;
    /// `DELETE` a session.
    async fn delete_session(&self, url: &str) -> Result<ApiOutcome, UiError>;
    /// `GET` messages-per-day statistics.
    async fn stats(&self, url: &str) -> Result<ChatStatsSeries, UiError>;
}

/// Server history for `session_id`; `None` when there is nothing to apply.
///
/// # Errors
/// Propagates transport and decode failures.
pub async fn load_history(
    backend: &dyn ChatBackend,
    config: &ChatConfig,
    session_id: Option<&str>,
) -> Result<Option<Vec<HistoryEntry>>, UiError> {
    let Some(session_id) = session_id.filter(|id| is_valid_session(Some(*id))) else {
        return Ok(None);
    };
    let Some(url) = config.messages_url(session_id) else {
        return Ok(None);
    };
    let response = backend.history(&url).await?;
    Ok(response.success.then_some(response.messages))
}

/// Result of sending one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Assistant answered.
    Reply {
        /// Reply text.
        text: String,
        /// Server time label, if any.
        time: Option<String>,
    },
    /// Assistant answered `success: false`.
    Rejected,
    /// The request failed.
    ConnectionFailed(UiError),
    /// No valid session; nothing was sent.
    NoSession,
    /// `sendUrl` missing; nothing was sent.
    NotConfigured,
}

/// Send `message` to the assistant.
pub async fn send_message(
    backend: &dyn ChatBackend,
    config: &ChatConfig,
    session_id: Option<&str>,
    message: &str,
) -> SendOutcome {
    let Some(session_id) = session_id.filter(|id| is_valid_session(Some(*id))) else {
        return SendOutcome::NoSession;
    };
    let Some(url) = config.send_url.as_deref() else {
        return SendOutcome::NotConfigured;
    };
    let request = SendMessageRequest {
        message: message.to_string(),
        session_id: session_id.to_string(),
    };
    match backend.send_message(url, &request).await {
        Ok(SendMessageResponse {
            success: true,
            message: Some(reply),
            ..
        }) => SendOutcome::Reply {
            text: reply.ai_response,
            time: reply.timestamp,
        },
        Ok(_) => SendOutcome::Rejected,
        Err(err) => SendOutcome::ConnectionFailed(err),
    }
}

/// Result of a session create/delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Navigate to the new session.
    Redirect(String),
    /// Session removed; the page reloads.
    Deleted,
    /// Failure message for an alert.
    Failed(String),
    /// User declined the confirmation.
    Cancelled,
    /// Endpoint not configured; nothing was sent.
    NotConfigured,
}

const CONNECTION_FAILED: &str = "Erro de conexão";

/// Create a session.
pub async fn new_session(backend: &dyn ChatBackend, config: &ChatConfig) -> SessionOutcome {
    let Some(url) = config.new_session_url.as_deref() else {
        return SessionOutcome::NotConfigured;
    };
    match backend.create_session(url).await {
        Ok(NewSessionResponse {
            success: true,
            redirect_url: Some(target),
            ..
        }) if !target.is_empty() => SessionOutcome::Redirect(target),
        Ok(response) => SessionOutcome::Failed(format!(
            "Erro ao criar nova sessão: {}",
            response.error.as_deref().unwrap_or("desconhecido")
        )),
        Err(_) => SessionOutcome::Failed(CONNECTION_FAILED.to_string()),
    }
}

/// Delete `session_id` after confirmation.
pub async fn delete_session(
    backend: &dyn ChatBackend,
    prompt: &dyn Prompt,
    config: &ChatConfig,
    session_id: &str,
) -> SessionOutcome {
    let Some(url) = config.delete_url(session_id) else {
        return SessionOutcome::NotConfigured;
    };
    if !prompt.confirm(DELETE_SESSION_CONFIRM) {
        return SessionOutcome::Cancelled;
    }
    match backend.delete_session(&url).await {
        Ok(outcome) if outcome.success => SessionOutcome::Deleted,
        Ok(outcome) => SessionOutcome::Failed(format!(
            "Erro ao deletar sessão: {}",
            outcome.error.as_deref().unwrap_or("desconhecido")
        )),
        Err(_) => SessionOutcome::Failed(CONNECTION_FAILED.to_string()),
    }
}

/// Messages-per-day series; `None` without a session, URL or data.
///
/// # Errors
/// Propagates transport and decode failures.
pub async fn fetch_stats(
    backend: &dyn ChatBackend,
    config: &ChatConfig,
    session_id: Option<&str>,
) -> Result<Option<Series>, UiError> {
    if !is_valid_session(session_id) {
        return Ok(None);
    }
    let Some(url) = config.stats_url.as_deref() else {
        return Ok(None);
    };
    let response = backend.stats(url).await?;
    Ok(response.success.then(|| Series {
        labels: response.labels,
        values: response.values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, ScriptedPrompt};
    use futures::executor::block_on;
    use serde_json::json;

    fn config() -> ChatConfig {
        ChatConfig {
            send_url: Some("/chat/send".into()),
            new_session_url: Some("/chat/new".into()),
            get_messages_base_url: Some("/chat/__ID__/messages".into()),
            delete_session_base_url: Some("/chat/__ID__/delete".into()),
            stats_url: Some("/chat/stats".into()),
            session_id: Some("s1".into()),
            ..ChatConfig::default()
        }
    }

    #[test]
    fn history_is_skipped_without_session() {
        let backend = FakeBackend::new();
        let loaded = block_on(load_history(&backend, &config(), Some("undefined")));
        assert_eq!(loaded, Ok(None));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn history_returns_entries_on_success() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/chat/s1/messages",
            Ok(json!({"success": true, "messages": [
                {"message": "oi", "response": "olá", "timestamp": "2024-05-01 10:00"}
            ]})),
        );
        let loaded = block_on(load_history(&backend, &config(), Some("s1"))).expect("load");
        assert_eq!(loaded.map(|entries| entries.len()), Some(1));
    }

    #[test]
    fn send_posts_json_and_maps_reply() {
        let backend = FakeBackend::new();
        backend.respond(
            "POST",
            "/chat/send",
            Ok(json!({"success": true, "message": {"ai_response": "pronto", "timestamp": "10:05"}})),
        );
        let outcome = block_on(send_message(&backend, &config(), Some("s1"), "oi"));
        assert_eq!(
            outcome,
            SendOutcome::Reply {
                text: "pronto".into(),
                time: Some("10:05".into())
            }
        );
        let body: serde_json::Value =
            serde_json::from_str(backend.calls()[0].body.as_deref().expect("body"))
                .expect("json");
        assert_eq!(body, json!({"message": "oi", "session_id": "s1"}));
    }

    #[test]
    fn send_maps_rejection_and_transport_failure() {
        let backend = FakeBackend::new();
        backend.respond("POST", "/chat/send", Ok(json!({"success": false})));
        backend.respond(
            "POST",
            "/chat/send",
            Err(UiError::Network("offline".into())),
        );
        assert_eq!(
            block_on(send_message(&backend, &config(), Some("s1"), "oi")),
            SendOutcome::Rejected
        );
        assert!(matches!(
            block_on(send_message(&backend, &config(), Some("s1"), "oi")),
            SendOutcome::ConnectionFailed(_)
        ));
    }

    #[test]
    fn send_without_session_issues_no_request() {
        let backend = FakeBackend::new();
        assert_eq!(
            block_on(send_message(&backend, &config(), Some(""), "oi")),
            SendOutcome::NoSession
        );
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn new_session_redirects_or_reports() {
        let backend = FakeBackend::new();
        backend.respond(
            "POST",
            "/chat/new",
            Ok(json!({"success": true, "redirect_url": "/chat/?session_id=s2"})),
        );
        backend.respond("POST", "/chat/new", Ok(json!({"success": false})));
        assert_eq!(
            block_on(new_session(&backend, &config())),
            SessionOutcome::Redirect("/chat/?session_id=s2".into())
        );
        assert_eq!(
            block_on(new_session(&backend, &config())),
            SessionOutcome::Failed("Erro ao criar nova sessão: desconhecido".into())
        );
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let backend = FakeBackend::new();
        let prompt = ScriptedPrompt::answering(&[false]);
        let outcome = block_on(delete_session(&backend, &prompt, &config(), "s1"));
        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert!(backend.calls().is_empty());
        assert_eq!(prompt.confirms(), vec![DELETE_SESSION_CONFIRM.to_string()]);
    }

    #[test]
    fn confirmed_delete_hits_encoded_url() {
        let backend = FakeBackend::new();
        backend.respond("DELETE", "/chat/a%2Fb/delete", Ok(json!({"success": true})));
        let prompt = ScriptedPrompt::answering(&[true]);
        let outcome = block_on(delete_session(&backend, &prompt, &config(), "a/b"));
        assert_eq!(outcome, SessionOutcome::Deleted);
        assert_eq!(backend.calls()[0].method, "DELETE");
    }

    #[test]
    fn stats_need_session_and_success() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/chat/stats",
            Ok(json!({"success": true, "labels": ["seg"], "values": [3]})),
        );
        assert_eq!(
            block_on(fetch_stats(&backend, &config(), None)),
            Ok(None)
        );
        let series = block_on(fetch_stats(&backend, &config(), Some("s1")))
            .expect("stats")
            .expect("series");
        assert_eq!(series.labels, vec!["seg".to_string()]);
    }
}
