//! Recording fakes for the native test suite.

use crate::core::error::UiError;
use crate::core::prompt::Prompt;
use crate::features::aditivos::api::AditivosBackend;
use crate::features::chat::api::ChatBackend;
use crate::features::dashboard::widgets::WidgetBackend;
use async_trait::async_trait;
use contratos_api_models::{
    AditivosResponse, ApiOutcome, ChatStatsSeries, HistoryResponse, NewSessionResponse,
    SendMessageRequest, SendMessageResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

/// One request seen by [`FakeBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub(crate) method: &'static str,
    pub(crate) url: String,
    pub(crate) body: Option<String>,
}

/// Backend fake answering from per-route queues and recording every call.
#[derive(Default)]
pub(crate) struct FakeBackend {
    routes: RefCell<BTreeMap<String, VecDeque<Result<Value, UiError>>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for `method url`.
    pub(crate) fn respond(&self, method: &str, url: &str, answer: Result<Value, UiError>) {
        self.routes
            .borrow_mut()
            .entry(format!("{method} {url}"))
            .or_default()
            .push_back(answer);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn answer<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        body: Option<String>,
    ) -> Result<T, UiError> {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });
        let next = self
            .routes
            .borrow_mut()
            .get_mut(&format!("{method} {url}"))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(UiError::Network(format!("unscripted {method} {url}"))))?;
        serde_json::from_value(next).map_err(|err| UiError::Decode(err.to_string()))
    }
}

#[async_trait(?Send)]
impl AditivosBackend for FakeBackend {
    async fn list(&self, path: &str) -> Result<AditivosResponse, UiError> {
        self.answer("GET", path, None)
    }

    async fn create(&self, path: &str, form_body: &str) -> Result<ApiOutcome, UiError> {
        self.answer("POST", path, Some(form_body.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<ApiOutcome, UiError> {
        self.answer("DELETE", path, None)
    }
}

#[async_trait(?Send)]
impl ChatBackend for FakeBackend {
    async fn history(&self, url: &str) -> Result<HistoryResponse, UiError> {
        self.answer("GET", url, None)
    }

    async fn send_message(
        &self,
        url: &str,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, UiError> {
        let body = serde_json::to_string(request).map_err(|err| UiError::Decode(err.to_string()))?;
        self.answer("POST", url, Some(body))
    }

    async fn create_session(&self, url: &str) -> Result<NewSessionResponse, UiError> {
        self.answer("POST", url, None)
    }

    async fn delete_session(&self, url: &str) -> Result<ApiOutcome, UiError> {
        self.answer("DELETE", url, None)
    }

    async fn stats(&self, url: &str) -> Result<ChatStatsSeries, UiError> {
        self.answer("GET", url, None)
    }
}

#[async_trait(?Send)]
impl WidgetBackend for FakeBackend {
    async fn widget_data(&self, url: &str) -> Result<Value, UiError> {
        self.answer("GET", url, None)
    }
}

/// Prompt answering confirms from a script and recording every dialog.
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    answers: RefCell<VecDeque<bool>>,
    confirms: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    /// Prompt that answers each confirm with the next value of `answers`,
    /// then declines.
    pub(crate) fn answering(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub(crate) fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}
