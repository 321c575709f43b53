//! Threat severity bar chart

use egui::{Ui, RichText};
use egui_plot::{Plot, Bar, BarChart, Legend};
use uuid::Uuid;

use aw_core::{Resource, Severity, SeveritySnapshot};

use super::{severity_color, ChartKind, ChartModel, Dataset};
use crate::{DashboardView, ViewAction, ViewId};

/// Bar chart with one dataset per severity
pub struct SeverityChartView {
    id: ViewId,
    title: String,
    chart: Option<ChartModel>,
}

impl Default for SeverityChartView {
    fn default() -> Self {
        Self::new()
    }
}

impl SeverityChartView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Threat Levels".to_string(),
            chart: None,
        }
    }

    /// Build the chart on the first snapshot, mutate its values afterwards
    pub fn update(&mut self, snapshot: &SeveritySnapshot) {
        let values = snapshot.values();

        match &mut self.chart {
            None => {
                let datasets = Severity::ALL
                    .iter()
                    .zip(values)
                    .map(|(severity, value)| Dataset {
                        label: severity.as_str().to_string(),
                        data: vec![value as f64],
                        color: severity_color(*severity),
                    })
                    .collect();
                self.chart = Some(ChartModel::new(ChartKind::Bar, vec![String::new()], datasets));
                tracing::debug!("Severity chart created");
            }
            Some(chart) => {
                for (index, value) in values.into_iter().enumerate() {
                    chart.set_data(index, vec![value as f64]);
                }
                chart.update();
            }
        }
    }

    pub fn chart(&self) -> Option<&ChartModel> {
        self.chart.as_ref()
    }
}

impl DashboardView for SeverityChartView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "SeverityChartView"
    }

    fn resource(&self) -> Resource {
        Resource::Severity
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ViewAction>) {
        let Some(chart) = &self.chart else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Waiting for threat data").weak());
            });
            return;
        };

        Plot::new(("severity_chart", self.id))
            .legend(Legend::default())
            .x_axis_label("Risk Classification of Threats")
            .include_y(0.0)
            .show_x(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (index, dataset) in chart.datasets().iter().enumerate() {
                    let value = dataset.data.first().copied().unwrap_or(0.0);
                    let bar = Bar::new(index as f64, value)
                        .width(0.7)
                        .name(&dataset.label)
                        .fill(dataset.color);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .color(dataset.color)
                            .name(&dataset.label),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(view: &SeverityChartView) -> Vec<Vec<f64>> {
        view.chart().unwrap().datasets().iter().map(|d| d.data.clone()).collect()
    }

    #[test]
    fn test_first_snapshot_builds_three_datasets() {
        let mut view = SeverityChartView::new();
        assert!(view.chart().is_none());

        view.update(&SeveritySnapshot { high: 3, medium: 1, low: 0 });

        let chart = view.chart().unwrap();
        let labels: Vec<&str> = chart.datasets().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["High", "Medium", "Low"]);
        assert_eq!(chart.datasets()[0].color, severity_color(Severity::High));
        assert_eq!(values(&view), vec![vec![3.0], vec![1.0], vec![0.0]]);
    }

    #[test]
    fn test_update_mutates_in_place() {
        let mut view = SeverityChartView::new();
        view.update(&SeveritySnapshot { high: 3, medium: 1, low: 0 });
        let id = view.chart().unwrap().id();

        view.update(&SeveritySnapshot { high: 5, medium: 1, low: 2 });

        let chart = view.chart().unwrap();
        assert_eq!(chart.id(), id);
        assert_eq!(chart.revision(), 1);
        assert_eq!(values(&view), vec![vec![5.0], vec![1.0], vec![2.0]]);

        // Colors are fixed at construction
        let colors: Vec<_> = chart.datasets().iter().map(|d| d.color).collect();
        let expected: Vec<_> = Severity::ALL.iter().map(|s| severity_color(*s)).collect();
        assert_eq!(colors, expected);
    }
}
