//! Dashboard widget set, edit mode and preferences.
//!
//! # Design
//! - At most one instance per widget id; tokens identify a render, not a widget.
//! - Engine positions always sync into the instances; only edit-mode changes
//!   are captured into the preferences that get saved.
//! - Content updates carry the token they were requested for; stale ones are dropped.

use crate::core::error::UiError;
use crate::core::prompt::Prompt;
use crate::core::storage::{DASHBOARD_PREFERENCES_KEY, KeyValueStore, save_json};
use crate::features::dashboard::layout::{clamp_cell, find_free_cell, merge_changes};
use crate::features::dashboard::registry::{DEFAULT_WIDGETS, WidgetDefinition, find};
use crate::features::dashboard::widgets::WidgetContent;
use contratos_api_models::{
    DashboardExport, DashboardPreferences, LayoutCell, LayoutEntry, WidgetSettings,
};
use std::collections::HashSet;
use std::rc::Rc;
use yew::functional::Reducible;

/// Confirmation shown before a reset.
pub const RESET_CONFIRM: &str = "Tem certeza que deseja resetar o layout para o padrão?";

/// One widget on the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetInstance {
    /// Catalog entry.
    pub definition: &'static WidgetDefinition,
    /// Render token embedded in canvas ids.
    pub token: String,
    /// Current position.
    pub cell: LayoutCell,
    /// Body state.
    pub content: WidgetContent,
}

impl WidgetInstance {
    fn new(definition: &'static WidgetDefinition, token: String, cell: LayoutCell) -> Self {
        Self {
            definition,
            token,
            cell,
            content: WidgetContent::Loading,
        }
    }

    /// Persisted form of the placement.
    #[must_use]
    pub fn entry(&self) -> LayoutEntry {
        LayoutEntry::new(self.definition.id, self.cell)
    }
}

/// Result of an add request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Placed on the grid.
    Added(LayoutCell),
    /// The widget is already on the dashboard.
    AlreadyPresent,
    /// No catalog entry for the id.
    Unknown,
}

/// Reducer input.
#[derive(Clone, Debug, PartialEq)]
pub enum DashboardAction {
    /// Place a catalog widget.
    Add {
        /// Widget id.
        id: String,
        /// Fresh render token.
        token: String,
    },
    /// Take a widget off the grid.
    Remove(String),
    /// Flip edit mode.
    ToggleEdit,
    /// Positions reported by the layout engine.
    LayoutChanged(Vec<LayoutEntry>),
    /// New render token for a refresh; content goes back to loading.
    Reload {
        /// Widget id.
        id: String,
        /// Fresh render token.
        token: String,
    },
    /// Finished load for the render identified by `token`.
    SetContent {
        /// Render token the request was made for.
        token: String,
        /// New body.
        content: WidgetContent,
    },
    /// Title override from the settings gear; empty clears it.
    SetTitle {
        /// Widget id.
        id: String,
        /// New title.
        title: String,
    },
}

/// Dashboard state.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    /// Widgets in grid order.
    pub widgets: Vec<WidgetInstance>,
    /// Grid column count.
    pub columns: u32,
    /// Edit mode flag.
    pub editing: bool,
    /// Preferences as they will be saved.
    pub preferences: DashboardPreferences,
}

impl DashboardState {
    /// Restore the stored layout or place the default widgets.
    ///
    /// Unknown and repeated ids in a stored layout are skipped.
    pub fn from_preferences(
        preferences: DashboardPreferences,
        columns: u32,
        mut next_token: impl FnMut() -> String,
    ) -> Self {
        let mut state = Self {
            widgets: Vec::new(),
            columns: columns.max(1),
            editing: false,
            preferences,
        };
        let stored = state
            .preferences
            .layout
            .clone()
            .filter(|layout| !layout.is_empty());
        match stored {
            Some(layout) => {
                for entry in layout {
                    let Some(definition) = find(&entry.id) else {
                        continue;
                    };
                    if state.contains(definition.id) {
                        continue;
                    }
                    let cell = clamp_cell(entry.cell(), state.columns);
                    state
                        .widgets
                        .push(WidgetInstance::new(definition, next_token(), cell));
                }
            }
            None => {
                for id in DEFAULT_WIDGETS {
                    state.add(id, next_token());
                }
            }
        }
        state
    }

    /// Whether `id` is on the dashboard.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.widgets.iter().any(|widget| widget.definition.id == id)
    }

    /// Instance for `id`.
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|widget| widget.definition.id == id)
    }

    /// Current placements in grid order.
    #[must_use]
    pub fn layout(&self) -> Vec<LayoutEntry> {
        self.widgets.iter().map(WidgetInstance::entry).collect()
    }

    /// Place `id` in the first free cell.
    pub fn add(&mut self, id: &str, token: String) -> AddOutcome {
        let Some(definition) = find(id) else {
            return AddOutcome::Unknown;
        };
        if self.contains(id) {
            return AddOutcome::AlreadyPresent;
        }
        let occupied: Vec<LayoutCell> = self.widgets.iter().map(|widget| widget.cell).collect();
        let size = definition.default_size;
        let cell = find_free_cell(&occupied, size.w, size.h, self.columns);
        self.widgets
            .push(WidgetInstance::new(definition, token, cell));
        self.capture();
        AddOutcome::Added(cell)
    }

    /// Remove `id`; returns the token whose charts must be released.
    pub fn remove(&mut self, id: &str) -> Option<String> {
        let index = self
            .widgets
            .iter()
            .position(|widget| widget.definition.id == id)?;
        let removed = self.widgets.remove(index);
        self.capture();
        Some(removed.token)
    }

    /// Flip edit mode; returns the new value.
    pub const fn toggle_edit(&mut self) -> bool {
        self.editing = !self.editing;
        self.editing
    }

    /// Sync engine positions into the instances and capture them in edit mode.
    pub fn apply_layout_change(&mut self, changed: &[LayoutEntry]) {
        let merged = merge_changes(&self.layout(), changed);
        for (widget, entry) in self.widgets.iter_mut().zip(merged) {
            widget.cell = clamp_cell(entry.cell(), self.columns);
        }
        self.capture();
    }

    fn capture(&mut self) {
        if self.editing {
            self.preferences.layout = Some(self.layout());
        }
    }

    /// Give `id` a fresh token and put it back to loading.
    pub fn reload(&mut self, id: &str, token: String) {
        if let Some(widget) = self
            .widgets
            .iter_mut()
            .find(|widget| widget.definition.id == id)
        {
            widget.token = token;
            widget.content = WidgetContent::Loading;
        }
    }

    /// Store `content` if `token` still names a live render; returns whether it did.
    pub fn set_content(&mut self, token: &str, content: WidgetContent) -> bool {
        match self.widgets.iter_mut().find(|widget| widget.token == token) {
            Some(widget) => {
                widget.content = content;
                true
            }
            None => false,
        }
    }

    /// Set or clear the title override of `id`.
    pub fn set_title(&mut self, id: &str, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            self.preferences.settings.remove(id);
        } else {
            self.preferences.settings.insert(
                id.to_string(),
                WidgetSettings {
                    title: Some(title.to_string()),
                },
            );
        }
    }

    /// Header text of `widget`.
    #[must_use]
    pub fn title_of<'a>(&'a self, widget: &'a WidgetInstance) -> &'a str {
        self.preferences
            .settings
            .get(widget.definition.id)
            .and_then(|settings| settings.title.as_deref())
            .unwrap_or(widget.definition.name)
    }

    /// Persist the preferences.
    ///
    /// # Errors
    /// Returns [`UiError::Storage`] when the write fails.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), UiError> {
        save_json(store, DASHBOARD_PREFERENCES_KEY, &self.preferences)
    }

    /// Snapshot for download, stamped with `export_date`.
    #[must_use]
    pub fn export(&self, export_date: &str) -> DashboardExport {
        DashboardExport {
            export_date: export_date.to_string(),
            layout: self.layout(),
            settings: self.preferences.settings.clone(),
        }
    }

    /// Apply `action` in place.
    pub fn apply(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::Add { id, token } => {
                self.add(&id, token);
            }
            DashboardAction::Remove(id) => {
                self.remove(&id);
            }
            DashboardAction::ToggleEdit => {
                self.toggle_edit();
            }
            DashboardAction::LayoutChanged(changed) => self.apply_layout_change(&changed),
            DashboardAction::Reload { id, token } => self.reload(&id, token),
            DashboardAction::SetContent { token, content } => {
                self.set_content(&token, content);
            }
            DashboardAction::SetTitle { id, title } => self.set_title(&id, &title),
        }
    }
}

impl Reducible for DashboardState {
    type Action = DashboardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Tokens whose load has been started; each token is fetched once.
#[derive(Debug, Default)]
pub struct LoadTracker {
    requested: HashSet<String>,
}

impl LoadTracker {
    /// Forget tokens no longer pending, then return the pending tokens not
    /// yet requested, marking them as requested.
    pub fn claim<'a>(
        &mut self,
        pending: impl IntoIterator<Item = &'a str> + Clone,
    ) -> Vec<String> {
        let live: HashSet<&str> = pending.clone().into_iter().collect();
        self.requested.retain(|token| live.contains(token.as_str()));
        pending
            .into_iter()
            .filter(|token| self.requested.insert((*token).to_string()))
            .map(str::to_string)
            .collect()
    }
}

/// `dashboard_export_{yyyy-mm-dd}.json`.
#[must_use]
pub fn export_file_name(export_date: &str) -> String {
    let day = export_date.split('T').next().unwrap_or(export_date);
    format!("dashboard_export_{day}.json")
}

/// Clear stored preferences after confirmation; returns whether the page
/// should reload.
pub fn reset_preferences(prompt: &dyn Prompt, store: &dyn KeyValueStore) -> bool {
    if !prompt.confirm(RESET_CONFIRM) {
        return false;
    }
    store.delete(DASHBOARD_PREFERENCES_KEY);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{MemoryStore, load_json};
    use crate::features::dashboard::widgets::WidgetPayload;
    use crate::testing::ScriptedPrompt;

    fn tokens() -> impl FnMut() -> String {
        let mut counter = 0;
        move || {
            counter += 1;
            format!("t{counter}")
        }
    }

    fn cell(x: u32, y: u32, w: u32, h: u32) -> LayoutCell {
        LayoutCell { x, y, w, h }
    }

    #[test]
    fn first_visit_places_defaults_with_packer() {
        let state = DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        let ids: Vec<&str> = state.widgets.iter().map(|w| w.definition.id).collect();
        assert_eq!(ids, DEFAULT_WIDGETS.to_vec());
        assert_eq!(state.widgets[3].cell, cell(0, 2, 6, 4));
        assert_eq!(state.widgets[4].cell, cell(6, 3, 4, 3));
        assert!(state.preferences.layout.is_none());
    }

    #[test]
    fn stored_layout_restores_in_order_and_skips_unknown() {
        let preferences = DashboardPreferences {
            layout: Some(vec![
                LayoutEntry::new("grafico-pizza", cell(4, 0, 4, 4)),
                LayoutEntry::new("widget-antigo", cell(0, 0, 2, 2)),
                LayoutEntry::new("kpi-empenhos", cell(0, 0, 3, 2)),
                LayoutEntry::new("grafico-pizza", cell(8, 8, 4, 4)),
            ]),
            ..DashboardPreferences::default()
        };
        let state = DashboardState::from_preferences(preferences, 12, tokens());
        assert_eq!(
            state.layout(),
            vec![
                LayoutEntry::new("grafico-pizza", cell(4, 0, 4, 4)),
                LayoutEntry::new("kpi-empenhos", cell(0, 0, 3, 2)),
            ]
        );
    }

    #[test]
    fn duplicate_and_unknown_adds_are_rejected() {
        let mut state =
            DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        assert_eq!(state.add("kpi-empenhos", "x".into()), AddOutcome::AlreadyPresent);
        assert_eq!(state.add("nada", "y".into()), AddOutcome::Unknown);
        assert!(matches!(
            state.add("acoes-rapidas", "z".into()),
            AddOutcome::Added(_)
        ));
        assert_eq!(state.widgets.len(), 6);
    }

    #[test]
    fn layout_changes_are_captured_only_in_edit_mode() {
        let mut state =
            DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        let moved = vec![LayoutEntry::new("kpi-empenhos", cell(0, 8, 3, 2))];
        state.apply(DashboardAction::LayoutChanged(moved.clone()));
        assert_eq!(state.widgets[0].cell, cell(0, 8, 3, 2));
        assert!(state.preferences.layout.is_none());

        state.apply(DashboardAction::ToggleEdit);
        state.apply(DashboardAction::LayoutChanged(vec![LayoutEntry::new(
            "kpi-financeiro",
            cell(9, 0, 3, 2),
        )]));
        let captured = state.preferences.layout.clone().expect("captured");
        assert_eq!(captured.len(), 5);
        assert_eq!(captured[0], moved[0]);
        assert_eq!(captured[1].cell(), cell(9, 0, 3, 2));
    }

    #[test]
    fn remove_returns_token_and_captures_in_edit_mode() {
        let mut state =
            DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        state.toggle_edit();
        assert_eq!(state.remove("kpi-contratos"), Some("t3".to_string()));
        assert_eq!(state.remove("kpi-contratos"), None);
        assert_eq!(state.preferences.layout.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn stale_content_is_dropped() {
        let mut state =
            DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        state.apply(DashboardAction::Reload {
            id: "kpi-empenhos".into(),
            token: "fresh".into(),
        });
        assert!(!state.set_content("t1", WidgetContent::Failed("late".into())));
        assert!(state.set_content(
            "fresh",
            WidgetContent::Ready(WidgetPayload::AcoesRapidas)
        ));
        assert_eq!(
            state.widget("kpi-empenhos").map(|w| &w.content),
            Some(&WidgetContent::Ready(WidgetPayload::AcoesRapidas))
        );
    }

    #[test]
    fn title_override_round_trips_through_save() {
        let store = MemoryStore::new();
        let mut state =
            DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        state.set_title("kpi-empenhos", "  Meus empenhos ");
        let widget = state.widgets[0].clone();
        assert_eq!(state.title_of(&widget), "Meus empenhos");
        state.save(&store).expect("save");
        let saved: DashboardPreferences = load_json(&store, DASHBOARD_PREFERENCES_KEY)
            .expect("load")
            .expect("present");
        assert_eq!(
            saved.settings["kpi-empenhos"].title.as_deref(),
            Some("Meus empenhos")
        );
        state.set_title("kpi-empenhos", "");
        assert_eq!(state.title_of(&widget), "KPI Empenhos");
    }

    #[test]
    fn reset_requires_confirmation() {
        let store = MemoryStore::new();
        store
            .set_raw(DASHBOARD_PREFERENCES_KEY, "{}")
            .expect("seed");
        assert!(!reset_preferences(&ScriptedPrompt::answering(&[false]), &store));
        assert!(store.get_raw(DASHBOARD_PREFERENCES_KEY).is_some());
        assert!(reset_preferences(&ScriptedPrompt::answering(&[true]), &store));
        assert!(store.get_raw(DASHBOARD_PREFERENCES_KEY).is_none());
    }

    #[test]
    fn export_carries_layout_and_settings() {
        let mut state =
            DashboardState::from_preferences(DashboardPreferences::default(), 12, tokens());
        state.set_title("alertas-sistema", "Avisos");
        let export = state.export("2024-05-01T10:00:00.000Z");
        assert_eq!(export.layout.len(), 5);
        assert_eq!(export.settings.len(), 1);
        assert_eq!(export.export_date, "2024-05-01T10:00:00.000Z");
        assert_eq!(
            export_file_name(&export.export_date),
            "dashboard_export_2024-05-01.json"
        );
    }

    #[test]
    fn load_tracker_requests_once_and_forgets_settled_tokens() {
        let mut tracker = LoadTracker::default();
        assert_eq!(tracker.claim(["a", "b"]), vec!["a", "b"]);
        assert!(tracker.claim(["a", "b"]).is_empty());
        assert!(tracker.claim(["b"]).is_empty());
        assert_eq!(tracker.claim(["a", "b"]), vec!["a"]);
        assert!(tracker.claim(std::iter::empty()).is_empty());
        assert_eq!(tracker.claim(["b"]), vec!["b"]);
    }
}
