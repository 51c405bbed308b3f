//! Static widget catalog.

use contratos_api_models::LayoutCell;

/// Library section a widget is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WidgetCategory {
    /// Headline indicators.
    Kpi,
    /// Charts.
    Grafico,
    /// Tables.
    Tabela,
    /// Alerts.
    Alerta,
    /// Shortcut buttons.
    Acao,
    /// Calendar.
    Calendario,
}

impl WidgetCategory {
    /// Portuguese section title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kpi => "Indicadores (KPI)",
            Self::Grafico => "Gráficos",
            Self::Tabela => "Tabelas",
            Self::Alerta => "Alertas",
            Self::Acao => "Ações",
            Self::Calendario => "Calendário",
        }
    }
}

/// Default footprint in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetSize {
    /// Columns.
    pub w: u32,
    /// Rows.
    pub h: u32,
}

/// Catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetDefinition {
    /// Stable id, also the data endpoint suffix.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Library description.
    pub description: &'static str,
    /// Bootstrap icon class.
    pub icon: &'static str,
    /// Library section.
    pub category: WidgetCategory,
    /// Size used when the widget is added.
    pub default_size: WidgetSize,
    /// Shows the settings gear.
    pub configurable: bool,
}

impl WidgetDefinition {
    /// Unplaced cell with the default size.
    #[must_use]
    pub const fn default_cell(&self) -> LayoutCell {
        LayoutCell {
            x: 0,
            y: 0,
            w: self.default_size.w,
            h: self.default_size.h,
        }
    }
}

const fn widget(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: WidgetCategory,
    (w, h): (u32, u32),
    configurable: bool,
) -> WidgetDefinition {
    WidgetDefinition {
        id,
        name,
        description,
        icon,
        category,
        default_size: WidgetSize { w, h },
        configurable,
    }
}

/// Every widget the dashboard can show, in library order.
pub static WIDGETS: [WidgetDefinition; 9] = [
    widget(
        "kpi-empenhos",
        "KPI Empenhos",
        "Métricas principais de empenhos",
        "bi-file-earmark-text",
        WidgetCategory::Kpi,
        (3, 2),
        true,
    ),
    widget(
        "kpi-financeiro",
        "KPI Financeiro",
        "Indicadores financeiros",
        "bi-currency-dollar",
        WidgetCategory::Kpi,
        (3, 2),
        true,
    ),
    widget(
        "kpi-contratos",
        "KPI Contratos",
        "Estatísticas e status dos contratos",
        "bi-file-earmark-check",
        WidgetCategory::Kpi,
        (3, 3),
        true,
    ),
    widget(
        "grafico-evolucao",
        "Evolução Temporal",
        "Gráfico de evolução dos dados",
        "bi-graph-up",
        WidgetCategory::Grafico,
        (6, 4),
        true,
    ),
    widget(
        "grafico-pizza",
        "Distribuição por Status",
        "Gráfico de pizza com status",
        "bi-pie-chart",
        WidgetCategory::Grafico,
        (4, 4),
        true,
    ),
    widget(
        "tabela-top-fornecedores",
        "Top Fornecedores",
        "Ranking dos principais fornecedores",
        "bi-building",
        WidgetCategory::Tabela,
        (4, 3),
        true,
    ),
    widget(
        "alertas-sistema",
        "Alertas do Sistema",
        "Notificações e alertas importantes",
        "bi-bell",
        WidgetCategory::Alerta,
        (4, 3),
        true,
    ),
    widget(
        "acoes-rapidas",
        "Ações Rápidas",
        "Botões de acesso rápido",
        "bi-lightning",
        WidgetCategory::Acao,
        (4, 2),
        false,
    ),
    widget(
        "calendario-vencimentos",
        "Calendário de Vencimentos",
        "Próximos vencimentos",
        "bi-calendar",
        WidgetCategory::Calendario,
        (4, 4),
        true,
    ),
];

/// Widgets placed on a first visit.
pub const DEFAULT_WIDGETS: [&str; 5] = [
    "kpi-empenhos",
    "kpi-financeiro",
    "kpi-contratos",
    "grafico-evolucao",
    "alertas-sistema",
];

/// Catalog entry for `id`.
#[must_use]
pub fn find(id: &str) -> Option<&'static WidgetDefinition> {
    WIDGETS.iter().find(|definition| definition.id == id)
}

/// Categories in order of first appearance.
#[must_use]
pub fn categories() -> Vec<WidgetCategory> {
    let mut seen = Vec::new();
    for definition in &WIDGETS {
        if !seen.contains(&definition.category) {
            seen.push(definition.category);
        }
    }
    seen
}

/// Widgets of one category, in library order.
#[must_use]
pub fn in_category(category: WidgetCategory) -> Vec<&'static WidgetDefinition> {
    WIDGETS
        .iter()
        .filter(|definition| definition.category == category)
        .collect()
}

/// Typed identity of a catalog widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    /// `kpi-empenhos`.
    KpiEmpenhos,
    /// `kpi-financeiro`.
    KpiFinanceiro,
    /// `kpi-contratos`.
    KpiContratos,
    /// `grafico-evolucao`.
    GraficoEvolucao,
    /// `grafico-pizza`.
    GraficoPizza,
    /// `tabela-top-fornecedores`.
    TopFornecedores,
    /// `alertas-sistema`.
    Alertas,
    /// `acoes-rapidas`.
    AcoesRapidas,
    /// `calendario-vencimentos`.
    Calendario,
}

impl WidgetKind {
    /// Kind for a catalog id.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Some(match id {
            "kpi-empenhos" => Self::KpiEmpenhos,
            "kpi-financeiro" => Self::KpiFinanceiro,
            "kpi-contratos" => Self::KpiContratos,
            "grafico-evolucao" => Self::GraficoEvolucao,
            "grafico-pizza" => Self::GraficoPizza,
            "tabela-top-fornecedores" => Self::TopFornecedores,
            "alertas-sistema" => Self::Alertas,
            "acoes-rapidas" => Self::AcoesRapidas,
            "calendario-vencimentos" => Self::Calendario,
            _ => return None,
        })
    }

    /// Content needs no backend data; a 404 is expected.
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self, Self::AcoesRapidas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique_and_typed() {
        for (index, definition) in WIDGETS.iter().enumerate() {
            assert!(
                WIDGETS[index + 1..].iter().all(|other| other.id != definition.id),
                "duplicate {}",
                definition.id
            );
            assert!(WidgetKind::from_id(definition.id).is_some());
        }
    }

    #[test]
    fn only_quick_actions_are_static_and_unconfigurable() {
        let quick = find("acoes-rapidas").expect("registered");
        assert!(!quick.configurable);
        assert!(WidgetKind::from_id(quick.id).is_some_and(WidgetKind::is_static));
        assert_eq!(
            WIDGETS.iter().filter(|definition| !definition.configurable).count(),
            1
        );
    }

    #[test]
    fn sizes_match_catalog() {
        let evolucao = find("grafico-evolucao").expect("registered");
        assert_eq!(evolucao.default_size, WidgetSize { w: 6, h: 4 });
        assert_eq!(find("kpi-contratos").map(|d| d.default_size.h), Some(3));
        assert!(find("desconhecido").is_none());
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        assert_eq!(
            categories(),
            vec![
                WidgetCategory::Kpi,
                WidgetCategory::Grafico,
                WidgetCategory::Tabela,
                WidgetCategory::Alerta,
                WidgetCategory::Acao,
                WidgetCategory::Calendario,
            ]
        );
        assert_eq!(WidgetCategory::Kpi.label(), "Indicadores (KPI)");
        assert_eq!(in_category(WidgetCategory::Kpi).len(), 3);
    }

    #[test]
    fn defaults_are_registered() {
        assert!(DEFAULT_WIDGETS.iter().all(|id| find(id).is_some()));
    }
}
