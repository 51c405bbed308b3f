//! Aditivos backend seam and the create/delete flows.
//!
//! # Design
//! - Validation failures never reach the network.
//! - Every flow reports through blocking alerts; transport errors are returned
//!   for the caller to log.

use crate::core::error::UiError;
use crate::core::prompt::Prompt;
use crate::features::aditivos::logic::{
    AditivoForm, CREATE_PATH, FormError, REQUIRED_FIELDS_MESSAGE, delete_path, encode_form,
    list_path,
};
use async_trait::async_trait;
use contratos_api_models::{Aditivo, AditivosResponse, ApiOutcome};

/// Inline message when the list cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Erro ao carregar aditivos existentes.";
/// Confirmation before deleting.
pub const DELETE_CONFIRM: &str = "Tem certeza que deseja excluir este aditivo?";

/// Aditivo endpoints.
#[async_trait(?Send)]
pub trait AditivosBackend {
    /// `GET` the list for a contract.
    async fn list(&self, path: &str) -> Result<AditivosResponse, UiError>;
    /// `POST` a form-encoded aditivo.
    async fn create(&self, path: &str, form_body: &str) -> Result<ApiOutcome, UiError>;
    /// `DELETE` one aditivo.
    async fn delete(&self, path: &str) -> Result<ApiOutcome, UiError>;
}

/// Amendments registered for `contrato_id`.
///
/// # Errors
/// Propagates transport and decode failures.
pub async fn load_aditivos(
    backend: &dyn AditivosBackend,
    contrato_id: &str,
) -> Result<Vec<Aditivo>, UiError> {
    Ok(backend.list(&list_path(contrato_id)).await?.aditivos)
}

/// Result of a create or delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Backend applied the change.
    Saved,
    /// Backend answered `success: false`.
    Rejected(String),
    /// The request failed.
    Failed(UiError),
    /// User declined the confirmation.
    Cancelled,
    /// Required fields missing; nothing was sent.
    Invalid(FormError),
}

impl MutationOutcome {
    /// Whether the list should be reloaded.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Validate and create an aditivo for `contrato_id`.
pub async fn submit_aditivo(
    backend: &dyn AditivosBackend,
    prompt: &dyn Prompt,
    contrato_id: &str,
    form: &AditivoForm,
) -> MutationOutcome {
    let novo = match form.validate(contrato_id) {
        Ok(novo) => novo,
        Err(err) => {
            prompt.alert(REQUIRED_FIELDS_MESSAGE);
            return MutationOutcome::Invalid(err);
        }
    };
    match backend.create(CREATE_PATH, &encode_form(&novo)).await {
        Ok(outcome) if outcome.success => {
            prompt.alert("Aditivo criado com sucesso!");
            MutationOutcome::Saved
        }
        Ok(outcome) => {
            let message = outcome.error_message().to_string();
            prompt.alert(&format!("Erro ao criar aditivo: {message}"));
            MutationOutcome::Rejected(message)
        }
        Err(err) => {
            prompt.alert("Erro ao salvar aditivo. Tente novamente.");
            MutationOutcome::Failed(err)
        }
    }
}

/// Delete `aditivo_id` after confirmation.
pub async fn delete_aditivo(
    backend: &dyn AditivosBackend,
    prompt: &dyn Prompt,
    aditivo_id: i64,
) -> MutationOutcome {
    if !prompt.confirm(DELETE_CONFIRM) {
        return MutationOutcome::Cancelled;
    }
    match backend.delete(&delete_path(aditivo_id)).await {
        Ok(outcome) if outcome.success => {
            prompt.alert("Aditivo excluído com sucesso!");
            MutationOutcome::Saved
        }
        Ok(outcome) => {
            let message = outcome.error_message().to_string();
            prompt.alert(&format!("Erro ao excluir aditivo: {message}"));
            MutationOutcome::Rejected(message)
        }
        Err(err) => {
            prompt.alert("Erro ao excluir aditivo. Tente novamente.");
            MutationOutcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, ScriptedPrompt};
    use futures::executor::block_on;
    use serde_json::json;

    fn form() -> AditivoForm {
        AditivoForm {
            numero_aditivo: "1".into(),
            tipo: "Prazo".into(),
            data_aditivo: "2024-02-01".into(),
            valor_financeiro: String::new(),
            prazo_dias: "60".into(),
            justificativa: "Chuvas".into(),
        }
    }

    #[test]
    fn list_decodes_string_numbers() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/contratos/5/aditivos",
            Ok(json!({"aditivos": [{"id": 1, "numero_aditivo": "1", "tipo": "Prazo",
                "data_aditivo": "2024-01-01", "justificativa": "x"}]})),
        );
        let list = block_on(load_aditivos(&backend, "5")).expect("list");
        assert_eq!(list[0].numero_aditivo, 1);
    }

    #[test]
    fn list_keeps_rows_with_null_date_or_justification() {
        let backend = FakeBackend::new();
        backend.respond(
            "GET",
            "/contratos/5/aditivos",
            Ok(json!({"success": true, "aditivos": [
                {"id": 1, "numero_aditivo": 1, "tipo": "PRORROGACAO", "data_aditivo": null,
                    "justificativa": "Atraso"},
                {"id": 2, "numero_aditivo": 2, "tipo": "VALOR", "data_aditivo": "2024-03-01",
                    "justificativa": null}
            ]})),
        );
        let list = block_on(load_aditivos(&backend, "5")).expect("list");
        assert_eq!(list.len(), 2);
        assert_eq!(crate::features::aditivos::logic::next_available_number(&list), 3);
    }

    #[test]
    fn invalid_form_alerts_and_sends_nothing() {
        let backend = FakeBackend::new();
        let prompt = ScriptedPrompt::default();
        let incomplete = AditivoForm {
            justificativa: String::new(),
            ..form()
        };
        let outcome = block_on(submit_aditivo(&backend, &prompt, "5", &incomplete));
        assert!(matches!(outcome, MutationOutcome::Invalid(_)));
        assert!(backend.calls().is_empty());
        assert_eq!(prompt.alerts(), vec![REQUIRED_FIELDS_MESSAGE.to_string()]);
    }

    #[test]
    fn create_posts_form_and_reports_success() {
        let backend = FakeBackend::new();
        backend.respond("POST", CREATE_PATH, Ok(json!({"success": true})));
        let prompt = ScriptedPrompt::default();
        let outcome = block_on(submit_aditivo(&backend, &prompt, "5", &form()));
        assert!(outcome.is_saved());
        let call = &backend.calls()[0];
        assert_eq!(call.method, "POST");
        assert!(
            call.body
                .as_deref()
                .is_some_and(|body| body.starts_with("contrato_id=5&numero_aditivo=1"))
        );
        assert_eq!(prompt.alerts(), vec!["Aditivo criado com sucesso!".to_string()]);
    }

    #[test]
    fn create_reports_rejection_and_network_failure() {
        let backend = FakeBackend::new();
        backend.respond("POST", CREATE_PATH, Ok(json!({"success": false})));
        backend.respond("POST", CREATE_PATH, Err(UiError::Network("x".into())));
        let prompt = ScriptedPrompt::default();
        let rejected = block_on(submit_aditivo(&backend, &prompt, "5", &form()));
        let failed = block_on(submit_aditivo(&backend, &prompt, "5", &form()));
        assert_eq!(rejected, MutationOutcome::Rejected("Erro desconhecido".into()));
        assert_eq!(failed, MutationOutcome::Failed(UiError::Network("x".into())));
        assert_eq!(
            prompt.alerts(),
            vec![
                "Erro ao criar aditivo: Erro desconhecido".to_string(),
                "Erro ao salvar aditivo. Tente novamente.".to_string(),
            ]
        );
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let backend = FakeBackend::new();
        let prompt = ScriptedPrompt::answering(&[false]);
        let outcome = block_on(delete_aditivo(&backend, &prompt, 4));
        assert_eq!(outcome, MutationOutcome::Cancelled);
        assert!(backend.calls().is_empty());
        assert_eq!(prompt.confirms(), vec![DELETE_CONFIRM.to_string()]);
    }

    #[test]
    fn confirmed_delete_hits_endpoint() {
        let backend = FakeBackend::new();
        backend.respond(
            "DELETE",
            "/contratos/aditivos/4/excluir",
            Ok(json!({"success": true})),
        );
        let prompt = ScriptedPrompt::answering(&[true]);
        assert!(block_on(delete_aditivo(&backend, &prompt, 4)).is_saved());
    }
}
