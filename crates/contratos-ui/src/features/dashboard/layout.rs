//! Grid geometry: engine options, capability check and the first-fit packer.
//!
//! # Design
//! - The packer mirrors GridStack's `autoPosition`: row-major scan, first gap wins.
//! - Layout captures always carry the full widget set, never a partial diff.

use crate::core::config::DashboardConfig;
use contratos_api_models::{LayoutCell, LayoutEntry};
use serde_json::{Value, json};

/// Options handed to `GridStack.init`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridOptions {
    /// Column count.
    pub columns: u32,
    /// Row height in pixels.
    pub cell_height: u32,
    /// Gap in pixels.
    pub margin: u32,
}

impl GridOptions {
    /// Options from page configuration.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            columns: config.columns.max(1),
            cell_height: config.cell_height,
            margin: config.margin,
        }
    }

    /// `GridStack.init` options; drag and resize start disabled until edit mode.
    #[must_use]
    pub fn engine_options(&self) -> Value {
        json!({
            "column": self.columns,
            "cellHeight": self.cell_height,
            "margin": self.margin,
            "float": false,
            "animate": true,
            "disableDrag": true,
            "disableResize": true,
        })
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

/// Layout engine chosen at mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutEngineKind {
    /// GridStack is loaded: drag, resize and auto-compaction.
    Interactive,
    /// Static CSS grid at packer positions; no drag or resize.
    StaticFallback,
}

impl LayoutEngineKind {
    /// Pick the engine from the capability check result.
    #[must_use]
    pub const fn detect(gridstack_available: bool) -> Self {
        if gridstack_available {
            Self::Interactive
        } else {
            Self::StaticFallback
        }
    }

    /// Whether widgets can be dragged and resized.
    #[must_use]
    pub const fn supports_drag(self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Whether two cells share any grid square.
#[must_use]
pub const fn overlaps(a: &LayoutCell, b: &LayoutCell) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

/// First free `w`×`h` cell scanning rows top-down, columns left-right.
#[must_use]
pub fn find_free_cell(occupied: &[LayoutCell], w: u32, h: u32, columns: u32) -> LayoutCell {
    let columns = columns.max(1);
    let w = w.clamp(1, columns);
    let h = h.max(1);
    let bottom = occupied.iter().map(|cell| cell.y + cell.h).max().unwrap_or(0);
    for y in 0..=bottom {
        for x in 0..=(columns - w) {
            let candidate = LayoutCell { x, y, w, h };
            if occupied.iter().all(|cell| !overlaps(cell, &candidate)) {
                return candidate;
            }
        }
    }
    LayoutCell {
        x: 0,
        y: bottom,
        w,
        h,
    }
}

/// Clamp a stored cell into the grid width.
#[must_use]
pub fn clamp_cell(cell: LayoutCell, columns: u32) -> LayoutCell {
    let columns = columns.max(1);
    let w = cell.w.clamp(1, columns);
    LayoutCell {
        x: cell.x.min(columns - w),
        y: cell.y,
        w,
        h: cell.h.max(1),
    }
}

/// Apply the changed items of an engine event to the full layout.
///
/// Entries keep their order; changed ids not in `current` are ignored.
#[must_use]
pub fn merge_changes(current: &[LayoutEntry], changed: &[LayoutEntry]) -> Vec<LayoutEntry> {
    current
        .iter()
        .map(|entry| {
            changed
                .iter()
                .rev()
                .find(|candidate| candidate.id == entry.id)
                .map_or_else(|| entry.clone(), Clone::clone)
        })
        .collect()
}

/// Rows needed to show every cell.
#[must_use]
pub fn grid_rows(cells: &[LayoutCell]) -> u32 {
    cells.iter().map(|cell| cell.y + cell.h).max().unwrap_or(0)
}

/// CSS grid placement for the static fallback.
#[must_use]
pub fn css_placement(cell: &LayoutCell) -> String {
    format!(
        "grid-column: {} / span {}; grid-row: {} / span {};",
        cell.x + 1,
        cell.w,
        cell.y + 1,
        cell.h
    )
}
