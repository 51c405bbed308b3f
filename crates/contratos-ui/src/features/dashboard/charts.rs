//! Chart lifecycle and Chart.js configurations.
//!
//! # Design
//! - One live chart per canvas id; a new chart destroys the previous one first.
//! - Canvas ids embed the widget's render token so removal can release them.
//! - Configurations are plain JSON so they can be tested off-browser.

use contratos_api_models::{ChartPoint, Series};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Handle to a live chart.
pub trait ChartInstance {
    /// Re-measure the canvas.
    fn resize(&self);
    /// Release the chart and its listeners.
    fn destroy(&self);
}

/// Live charts keyed by canvas id.
#[derive(Debug)]
pub struct ChartRegistry<C: ChartInstance> {
    charts: BTreeMap<String, C>,
}

impl<C: ChartInstance> Default for ChartRegistry<C> {
    fn default() -> Self {
        Self {
            charts: BTreeMap::new(),
        }
    }
}

impl<C: ChartInstance> ChartRegistry<C> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy any chart on `canvas_id`, then register the one `build` returns.
    ///
    /// # Errors
    /// Propagates the builder's error; the canvas is left without a chart.
    pub fn replace_with<E>(
        &mut self,
        canvas_id: &str,
        build: impl FnOnce() -> Result<C, E>,
    ) -> Result<(), E> {
        if let Some(previous) = self.charts.remove(canvas_id) {
            previous.destroy();
        }
        let chart = build()?;
        self.charts.insert(canvas_id.to_string(), chart);
        Ok(())
    }

    /// Resize the registered charts among `canvas_ids`; returns how many.
    pub fn resize_within<S: AsRef<str>>(&self, canvas_ids: &[S]) -> usize {
        canvas_ids
            .iter()
            .filter_map(|id| self.charts.get(id.as_ref()))
            .inspect(|chart| chart.resize())
            .count()
    }

    /// Destroy every chart whose canvas id carries `token`; returns how many.
    pub fn release_token(&mut self, token: &str) -> usize {
        let suffix = format!("-{token}");
        let doomed: Vec<String> = self
            .charts
            .keys()
            .filter(|id| id.ends_with(&suffix))
            .cloned()
            .collect();
        for id in &doomed {
            if let Some(chart) = self.charts.remove(id) {
                chart.destroy();
            }
        }
        doomed.len()
    }

    /// Destroy everything.
    pub fn clear(&mut self) {
        for (_, chart) in std::mem::take(&mut self.charts) {
            chart.destroy();
        }
    }

    /// Live chart count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    /// Whether no chart is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Whether `canvas_id` has a live chart.
    #[must_use]
    pub fn contains(&self, canvas_id: &str) -> bool {
        self.charts.contains_key(canvas_id)
    }
}

/// Chart canvases a widget can own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartSlot {
    /// Line chart of `grafico-evolucao`.
    Evolucao,
    /// Doughnut of `grafico-pizza`.
    Pizza,
    /// Doughnut of `kpi-contratos`.
    Contratos,
}

impl ChartSlot {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Evolucao => "evolucao",
            Self::Pizza => "pizza",
            Self::Contratos => "contratos",
        }
    }
}

/// `chart-{slot}-{token}`.
#[must_use]
pub fn canvas_id(slot: ChartSlot, token: &str) -> String {
    format!("chart-{}-{token}", slot.prefix())
}

/// Every canvas id a widget rendered with `token` may own.
#[must_use]
pub fn canvas_ids_for(token: &str) -> Vec<String> {
    [ChartSlot::Evolucao, ChartSlot::Pizza, ChartSlot::Contratos]
        .into_iter()
        .map(|slot| canvas_id(slot, token))
        .collect()
}

/// Colours of the contract status doughnut: active, expiring, expired.
pub const STATUS_COLORS: [&str; 3] = ["#28a745", "#ffc107", "#dc3545"];

/// Line chart of the evolution series.
#[must_use]
pub fn evolucao_config(series: Option<&Series>) -> Value {
    let (labels, values) = series.map_or((&[][..], &[][..]), |series| {
        (series.labels.as_slice(), series.values.as_slice())
    });
    json!({
        "type": "line",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": "Evolução",
                "data": values,
                "tension": 0.3,
                "fill": true,
            }],
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": true } },
            "scales": {
                "x": { "grid": { "display": false } },
                "y": { "beginAtZero": true },
            },
        },
    })
}

/// Series shown by the status doughnut; placeholder slices when absent.
#[must_use]
pub fn pizza_series(series: Option<&Series>) -> Series {
    series.cloned().unwrap_or_else(|| Series {
        labels: vec!["A".into(), "B".into(), "C".into()],
        values: vec![30.0, 50.0, 20.0],
    })
}

/// Status distribution doughnut.
#[must_use]
pub fn pizza_config(series: Option<&Series>) -> Value {
    let series = pizza_series(series);
    json!({
        "type": "doughnut",
        "data": {
            "labels": series.labels,
            "datasets": [{ "data": series.values }],
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "cutout": "55%",
            "plugins": { "legend": { "position": "bottom" } },
        },
    })
}

/// Contract status doughnut.
#[must_use]
pub fn contratos_config(points: &[ChartPoint]) -> Value {
    let labels: Vec<&str> = points.iter().map(|point| point.label.as_str()).collect();
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();
    json!({
        "type": "doughnut",
        "data": {
            "labels": labels,
            "datasets": [{
                "data": values,
                "backgroundColor": STATUS_COLORS,
            }],
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "cutout": "60%",
            "plugins": { "legend": { "display": false } },
        },
    })
}

/// Messages-per-day line chart of the chat insights page.
#[must_use]
pub fn chat_stats_config(series: &Series) -> Value {
    json!({
        "type": "line",
        "data": {
            "labels": series.labels,
            "datasets": [{
                "label": "Mensagens por dia",
                "data": series.values,
                "tension": 0.3,
                "fill": false,
            }],
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": { "y": { "beginAtZero": true } },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeChart {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ChartInstance for FakeChart {
        fn resize(&self) {
            self.log.borrow_mut().push(format!("resize {}", self.name));
        }

        fn destroy(&self) {
            self.log.borrow_mut().push(format!("destroy {}", self.name));
        }
    }

    fn chart(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> FakeChart {
        log.borrow_mut().push(format!("create {name}"));
        FakeChart {
            name,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn replacing_destroys_previous_before_building() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartRegistry::new();
        let id = canvas_id(ChartSlot::Pizza, "t1");
        registry
            .replace_with(&id, || Ok::<_, ()>(chart("first", &log)))
            .expect("first");
        registry
            .replace_with(&id, || Ok::<_, ()>(chart("second", &log)))
            .expect("second");
        assert_eq!(
            *log.borrow(),
            vec!["create first", "destroy first", "create second"]
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_build_leaves_canvas_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartRegistry::new();
        registry
            .replace_with("chart-pizza-t1", || Ok::<_, &str>(chart("old", &log)))
            .expect("first");
        let result = registry.replace_with("chart-pizza-t1", || Err("no canvas"));
        assert_eq!(result, Err("no canvas"));
        assert!(!registry.contains("chart-pizza-t1"));
    }

    #[test]
    fn resize_touches_only_registered_canvases() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartRegistry::new();
        registry
            .replace_with("chart-evolucao-t1", || Ok::<_, ()>(chart("line", &log)))
            .expect("line");
        let resized = registry.resize_within(&["chart-evolucao-t1", "chart-pizza-zz"]);
        assert_eq!(resized, 1);
        assert_eq!(registry.resize_within(&canvas_ids_for("t1")), 1);
        assert_eq!(log.borrow().last().map(String::as_str), Some("resize line"));
    }

    #[test]
    fn release_token_destroys_only_that_widget() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ChartRegistry::new();
        for (id, name) in [
            ("chart-contratos-aaa", "mine"),
            ("chart-pizza-bbb", "other"),
        ] {
            registry
                .replace_with(id, || Ok::<_, ()>(chart(name, &log)))
                .expect("chart");
        }
        assert_eq!(registry.release_token("aaa"), 1);
        assert!(registry.contains("chart-pizza-bbb"));
        assert!(log.borrow().contains(&"destroy mine".to_string()));
    }

    #[test]
    fn pizza_defaults_to_placeholder_slices() {
        let config = pizza_config(None);
        assert_eq!(config["data"]["labels"], json!(["A", "B", "C"]));
        assert_eq!(config["data"]["datasets"][0]["data"], json!([30.0, 50.0, 20.0]));
        assert_eq!(config["options"]["cutout"], "55%");
    }

    #[test]
    fn evolucao_without_series_is_empty_line() {
        let config = evolucao_config(None);
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"], json!([]));
    }

    #[test]
    fn contratos_uses_status_colours() {
        let points = vec![ChartPoint {
            label: "Ativos".into(),
            value: 4.0,
        }];
        let config = contratos_config(&points);
        assert_eq!(
            config["data"]["datasets"][0]["backgroundColor"],
            json!(["#28a745", "#ffc107", "#dc3545"])
        );
        assert_eq!(config["data"]["labels"], json!(["Ativos"]));
    }

    #[test]
    fn canvas_ids_embed_token() {
        assert_eq!(canvas_id(ChartSlot::Evolucao, "x1"), "chart-evolucao-x1");
        assert_eq!(canvas_id(ChartSlot::Contratos, "x1"), "chart-contratos-x1");
    }
}
