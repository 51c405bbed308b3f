//! Aditivo form validation and list presentation.
//!
//! # Design
//! - Form inputs stay as strings until submit.
//! - Validation happens before any request is built.

use crate::core::format::{format_brl, format_date_br};
use contratos_api_models::{Aditivo, NovoAditivo};
use std::collections::BTreeSet;
use thiserror::Error;

/// Alert shown when a required field is empty.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Por favor, preencha todos os campos obrigatórios.";

/// Amendment types offered by the form: stored value and label.
pub const TIPO_OPTIONS: [(&str, &str); 5] = [
    ("PRORROGACAO", "Prorrogação de prazo"),
    ("REAJUSTE", "Reajuste"),
    ("ACRESCIMO", "Acréscimo"),
    ("SUPRESSAO", "Supressão"),
    ("ALTERACAO", "Alteração qualitativa"),
];

/// Smallest positive number not used by `existing`.
#[must_use]
pub fn next_available_number(existing: &[Aditivo]) -> u32 {
    let used: BTreeSet<u32> = existing.iter().map(|a| a.numero_aditivo).collect();
    (1..).find(|candidate| !used.contains(candidate)).unwrap_or(1)
}

/// Options offered by the number select.
#[must_use]
pub fn number_options(existing: &[Aditivo]) -> Vec<u32> {
    let highest = existing
        .iter()
        .map(|a| a.numero_aditivo)
        .max()
        .unwrap_or(0)
        .max(next_available_number(existing));
    (1..=highest.max(10)).collect()
}

/// Client-side validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct FormError {
    /// Names of the empty required fields.
    pub missing: Vec<&'static str>,
}

/// Raw "Novo Aditivo" form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AditivoForm {
    /// Selected amendment number.
    pub numero_aditivo: String,
    /// Amendment type.
    pub tipo: String,
    /// Date input value.
    pub data_aditivo: String,
    /// Optional value.
    pub valor_financeiro: String,
    /// Optional term in days.
    pub prazo_dias: String,
    /// Justification.
    pub justificativa: String,
}

impl AditivoForm {
    /// Fresh form with a suggested number.
    #[must_use]
    pub fn with_number(numero: u32) -> Self {
        Self {
            numero_aditivo: numero.to_string(),
            ..Self::default()
        }
    }

    /// Validate into a request payload for `contrato_id`.
    ///
    /// # Errors
    /// Returns [`FormError`] naming every empty required field.
    pub fn validate(&self, contrato_id: &str) -> Result<NovoAditivo, FormError> {
        let required = [
            ("numero_aditivo", &self.numero_aditivo),
            ("tipo", &self.tipo),
            ("data_aditivo", &self.data_aditivo),
            ("justificativa", &self.justificativa),
        ];
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        let numero = self.numero_aditivo.trim().parse::<u32>().ok();
        if numero.is_none() && !missing.contains(&"numero_aditivo") {
            missing.insert(0, "numero_aditivo");
        }
        match numero {
            Some(numero_aditivo) if missing.is_empty() => Ok(NovoAditivo {
                contrato_id: contrato_id.to_string(),
                numero_aditivo,
                tipo: self.tipo.trim().to_string(),
                data_aditivo: self.data_aditivo.trim().to_string(),
                valor_financeiro: optional(&self.valor_financeiro),
                prazo_dias: optional(&self.prazo_dias),
                justificativa: self.justificativa.trim().to_string(),
            }),
            _ => Err(FormError { missing }),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `application/x-www-form-urlencoded` body for a new aditivo.
#[must_use]
pub fn encode_form(novo: &NovoAditivo) -> String {
    novo.form_pairs()
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// List endpoint for a contract.
#[must_use]
pub fn list_path(contrato_id: &str) -> String {
    format!("/contratos/{}/aditivos", urlencoding::encode(contrato_id))
}

/// Create endpoint.
pub const CREATE_PATH: &str = "/contratos/aditivos/criar";

/// Delete endpoint for one aditivo.
#[must_use]
pub fn delete_path(aditivo_id: i64) -> String {
    format!("/contratos/aditivos/{aditivo_id}/excluir")
}

/// Display model for one list row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AditivoRow {
    /// Backend id for deletion.
    pub id: i64,
    /// `"{n}° Termo Aditivo"`.
    pub heading: String,
    /// Amendment type.
    pub tipo: String,
    /// `dd/mm/yyyy`.
    pub data: String,
    /// BRL value when present.
    pub valor: Option<String>,
    /// `"{n} dias"` when present.
    pub prazo: Option<String>,
    /// Justification.
    pub justificativa: String,
}

impl From<&Aditivo> for AditivoRow {
    fn from(aditivo: &Aditivo) -> Self {
        Self {
            id: aditivo.id,
            heading: format!("{}° Termo Aditivo", aditivo.numero_aditivo),
            tipo: aditivo.tipo.clone(),
            data: format_date_br(&aditivo.data_aditivo),
            valor: aditivo
                .valor_financeiro
                .filter(|valor| valor.abs() > f64::EPSILON)
                .map(format_brl),
            prazo: aditivo
                .prazo_dias
                .filter(|dias| *dias > 0)
                .map(|dias| format!("{dias} dias")),
            justificativa: aditivo.justificativa.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aditivo(id: i64, numero: u32) -> Aditivo {
        Aditivo {
            id,
            numero_aditivo: numero,
            tipo: "Prazo".into(),
            data_aditivo: "2024-03-10".into(),
            valor_financeiro: None,
            prazo_dias: None,
            justificativa: "Atraso".into(),
        }
    }

    fn filled() -> AditivoForm {
        AditivoForm {
            numero_aditivo: "2".into(),
            tipo: "Valor".into(),
            data_aditivo: "2024-04-01".into(),
            valor_financeiro: "1500.50".into(),
            prazo_dias: " ".into(),
            justificativa: "Reajuste anual".into(),
        }
    }

    #[test]
    fn next_number_fills_first_gap() {
        assert_eq!(next_available_number(&[]), 1);
        assert_eq!(
            next_available_number(&[aditivo(1, 1), aditivo(2, 2), aditivo(3, 4)]),
            3
        );
        assert_eq!(next_available_number(&[aditivo(1, 2)]), 1);
    }

    #[test]
    fn options_cover_existing_and_suggested() {
        assert_eq!(number_options(&[]).len(), 10);
        assert_eq!(number_options(&[aditivo(1, 12)]).last(), Some(&12));
    }

    #[test]
    fn validation_names_missing_fields() {
        let form = AditivoForm {
            justificativa: "   ".into(),
            tipo: String::new(),
            ..filled()
        };
        let err = form.validate("7").expect_err("invalid");
        assert_eq!(err.missing, vec!["tipo", "justificativa"]);
    }

    #[test]
    fn valid_form_trims_and_drops_blank_optionals() {
        let novo = filled().validate("7").expect("valid");
        assert_eq!(novo.numero_aditivo, 2);
        assert_eq!(novo.valor_financeiro.as_deref(), Some("1500.50"));
        assert_eq!(novo.prazo_dias, None);
    }

    #[test]
    fn form_body_is_url_encoded() {
        let novo = filled().validate("7").expect("valid");
        assert_eq!(
            encode_form(&novo),
            "contrato_id=7&numero_aditivo=2&tipo=Valor&data_aditivo=2024-04-01&valor_financeiro=1500.50&justificativa=Reajuste%20anual"
        );
    }

    #[test]
    fn row_formats_value_date_and_term() {
        let mut record = aditivo(9, 3);
        record.valor_financeiro = Some(1500.5);
        record.prazo_dias = Some(90);
        let row = AditivoRow::from(&record);
        assert_eq!(row.heading, "3° Termo Aditivo");
        assert_eq!(row.data, "10/03/2024");
        assert_eq!(row.valor.as_deref(), Some("R$ 1.500,50"));
        assert_eq!(row.prazo.as_deref(), Some("90 dias"));
        assert_eq!(delete_path(9), "/contratos/aditivos/9/excluir");
        assert_eq!(list_path("12"), "/contratos/12/aditivos");
    }
}
