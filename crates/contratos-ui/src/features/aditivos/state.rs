//! Aditivos modal state.
//!
//! # Design
//! - One reducer per modal instance; reopening resets everything.
//! - The list keeps its load status so failures render inline.

use crate::features::aditivos::logic::{AditivoForm, AditivoRow, next_available_number, number_options};
use contratos_api_models::Aditivo;
use std::rc::Rc;
use yew::functional::Reducible;

/// Load status of the amendment list.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ListStatus {
    /// Request in flight.
    #[default]
    Loading,
    /// Amendments loaded.
    Loaded(Vec<Aditivo>),
    /// Request failed.
    Failed,
}

/// Form field addressed by [`AditivosAction::Edit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// Number select.
    Numero,
    /// Type select.
    Tipo,
    /// Date input.
    Data,
    /// Value input.
    Valor,
    /// Term input.
    Prazo,
    /// Justification textarea.
    Justificativa,
}

/// Reducer input.
#[derive(Clone, Debug, PartialEq)]
pub enum AditivosAction {
    /// Open the modal for a contract.
    Open {
        /// Contract id.
        contrato_id: String,
        /// Contract number shown in the header.
        numero_contrato: String,
    },
    /// List request finished.
    Loaded(Vec<Aditivo>),
    /// List request failed.
    LoadFailed,
    /// Field edit.
    Edit(FormField, String),
    /// Submit in flight.
    SetSaving(bool),
    /// Clear the form after a successful create.
    ResetForm,
    /// Hide the modal.
    Close,
}

/// Modal state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AditivosState {
    /// Modal visible.
    pub open: bool,
    /// Contract being amended.
    pub contrato_id: String,
    /// Contract number for the header.
    pub numero_contrato: String,
    /// Existing amendments.
    pub list: ListStatus,
    /// "Novo Aditivo" inputs.
    pub form: AditivoForm,
    /// Create request in flight.
    pub saving: bool,
}

impl AditivosState {
    /// Apply `action` in place.
    pub fn apply(&mut self, action: AditivosAction) {
        match action {
            AditivosAction::Open {
                contrato_id,
                numero_contrato,
            } => {
                *self = Self {
                    open: true,
                    contrato_id,
                    numero_contrato,
                    ..Self::default()
                };
            }
            AditivosAction::Loaded(aditivos) => {
                self.form.numero_aditivo = next_available_number(&aditivos).to_string();
                self.list = ListStatus::Loaded(aditivos);
            }
            AditivosAction::LoadFailed => self.list = ListStatus::Failed,
            AditivosAction::Edit(field, value) => {
                let slot = match field {
                    FormField::Numero => &mut self.form.numero_aditivo,
                    FormField::Tipo => &mut self.form.tipo,
                    FormField::Data => &mut self.form.data_aditivo,
                    FormField::Valor => &mut self.form.valor_financeiro,
                    FormField::Prazo => &mut self.form.prazo_dias,
                    FormField::Justificativa => &mut self.form.justificativa,
                };
                *slot = value;
            }
            AditivosAction::SetSaving(saving) => self.saving = saving,
            AditivosAction::ResetForm => {
                let suggested = next_available_number(self.aditivos());
                self.form = AditivoForm::with_number(suggested);
            }
            AditivosAction::Close => self.open = false,
        }
    }

    /// Loaded amendments, empty otherwise.
    #[must_use]
    pub fn aditivos(&self) -> &[Aditivo] {
        match &self.list {
            ListStatus::Loaded(aditivos) => aditivos,
            ListStatus::Loading | ListStatus::Failed => &[],
        }
    }

    /// Display rows for the loaded list.
    #[must_use]
    pub fn rows(&self) -> Vec<AditivoRow> {
        self.aditivos().iter().map(AditivoRow::from).collect()
    }

    /// Options for the number select.
    #[must_use]
    pub fn number_options(&self) -> Vec<u32> {
        number_options(self.aditivos())
    }
}

impl Reducible for AditivosState {
    type Action = AditivosAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}
