//! `gloo-net` implementation of every backend seam.

use crate::core::error::UiError;
use crate::features::aditivos::api::AditivosBackend;
use crate::features::chat::api::ChatBackend;
use crate::features::dashboard::widgets::WidgetBackend;
use async_trait::async_trait;
use contratos_api_models::{
    AditivosResponse, ApiOutcome, ChatStatsSeries, HistoryResponse, NewSessionResponse,
    SendMessageRequest, SendMessageResponse,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use web_sys::RequestCredentials;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Same-origin client; paths are used as given.
#[derive(Clone, Debug, Default)]
pub(crate) struct HttpClient;

impl HttpClient {
    pub(crate) const fn new() -> Self {
        Self
    }

    async fn send(request: Request) -> Result<Response, UiError> {
        request
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await
            .map_err(|err| UiError::Network(err.to_string()))
    }

    /// Decode a `2xx` body; anything else is [`UiError::Http`].
    async fn read_ok<T: DeserializeOwned>(request: Request) -> Result<T, UiError> {
        let response = Self::send(request).await?;
        if !response.ok() {
            return Err(UiError::Http {
                status: response.status(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| UiError::Decode(err.to_string()))
    }

    /// Decode the body whatever the status; mutating endpoints report
    /// `{success:false, error}` with 4xx codes.
    async fn read_any<T: DeserializeOwned>(request: Request) -> Result<T, UiError> {
        let response = Self::send(request).await?;
        let status = response.status();
        let ok = response.ok();
        let text = response
            .text()
            .await
            .map_err(|err| UiError::Network(err.to_string()))?;
        match serde_json::from_str::<T>(&text) {
            Ok(body) => Ok(body),
            Err(err) if ok => Err(UiError::Decode(err.to_string())),
            Err(_) => Err(UiError::Http { status }),
        }
    }
}

#[async_trait(?Send)]
impl AditivosBackend for HttpClient {
    async fn list(&self, path: &str) -> Result<AditivosResponse, UiError> {
        Self::read_ok(Request::get(path)).await
    }

    async fn create(&self, path: &str, form_body: &str) -> Result<ApiOutcome, UiError> {
        let request = Request::post(path)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .body(form_body);
        Self::read_any(request).await
    }

    async fn delete(&self, path: &str) -> Result<ApiOutcome, UiError> {
        Self::read_any(Request::delete(path)).await
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpClient {
    async fn history(&self, url: &str) -> Result<HistoryResponse, UiError> {
        Self::read_ok(Request::get(url)).await
    }

    async fn send_message(
        &self,
        url: &str,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, UiError> {
        let request = Request::post(url)
            .json(request)
            .map_err(|err| UiError::Decode(err.to_string()))?;
        Self::read_any(request).await
    }

    async fn create_session(&self, url: &str) -> Result<NewSessionResponse, UiError> {
        Self::read_any(Request::post(url).header("Content-Type", "application/json")).await
    }

    async fn delete_session(&self, url: &str) -> Result<ApiOutcome, UiError> {
        Self::read_any(Request::delete(url)).await
    }

    async fn stats(&self, url: &str) -> Result<ChatStatsSeries, UiError> {
        Self::read_ok(Request::get(url)).await
    }
}

#[async_trait(?Send)]
impl WidgetBackend for HttpClient {
    async fn widget_data(&self, url: &str) -> Result<Value, UiError> {
        Self::read_ok(Request::get(url)).await
    }
}
