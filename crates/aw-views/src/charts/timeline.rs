//! Alerts-over-time line chart

use egui::{Ui, Color32, RichText};
use egui_plot::{Plot, PlotPoints, Line, Legend};
use uuid::Uuid;

use aw_core::{Resource, TimeSeriesSnapshot};

use super::{ChartKind, ChartModel, Dataset};
use crate::{DashboardView, ViewAction, ViewId};

const SERIES_LABEL: &str = "Alerts Over Time";
const SERIES_COLOR: Color32 = Color32::from_rgb(37, 99, 235);

/// Line chart of alert counts per time bucket.
///
/// Snapshots are expected to carry as many labels as counts.
pub struct TimeSeriesChartView {
    id: ViewId,
    title: String,
    chart: Option<ChartModel>,
}

impl Default for TimeSeriesChartView {
    fn default() -> Self {
        Self::new()
    }
}

fn as_values(counts: &[u64]) -> Vec<f64> {
    counts.iter().map(|&c| c as f64).collect()
}

impl TimeSeriesChartView {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Alerts Over Time".to_string(),
            chart: None,
        }
    }

    /// Build the chart on the first snapshot, replace labels and values afterwards
    pub fn update(&mut self, snapshot: &TimeSeriesSnapshot) {
        match &mut self.chart {
            None => {
                let dataset = Dataset {
                    label: SERIES_LABEL.to_string(),
                    data: as_values(&snapshot.counts),
                    color: SERIES_COLOR,
                };
                self.chart = Some(ChartModel::new(ChartKind::Line, snapshot.labels.clone(), vec![dataset]));
                tracing::debug!("Time series chart created with {} buckets", snapshot.labels.len());
            }
            Some(chart) => {
                chart.set_labels(snapshot.labels.clone());
                chart.set_data(0, as_values(&snapshot.counts));
                chart.update();
            }
        }
    }

    pub fn chart(&self) -> Option<&ChartModel> {
        self.chart.as_ref()
    }
}

impl DashboardView for TimeSeriesChartView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "TimeSeriesChartView"
    }

    fn resource(&self) -> Resource {
        Resource::TimeSeries
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ViewAction>) {
        let Some(chart) = &self.chart else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Waiting for time series data").weak());
            });
            return;
        };

        let labels = chart.labels().to_vec();

        Plot::new(("timeline_chart", self.id))
            .legend(Legend::default())
            .x_axis_label("Time")
            .y_axis_label("Number of Alerts")
            .include_y(0.0)
            .x_axis_formatter(move |value, _max_chars, _range| {
                let index = value.round();
                if (value - index).abs() > f64::EPSILON || index < 0.0 {
                    return String::new();
                }
                labels.get(index as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for dataset in chart.datasets() {
                    let points: Vec<[f64; 2]> = dataset
                        .data
                        .iter()
                        .enumerate()
                        .map(|(i, v)| [i as f64, *v])
                        .collect();
                    plot_ui.line(
                        Line::new(PlotPoints::new(points))
                            .color(dataset.color)
                            .width(2.0)
                            .name(&dataset.label),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(labels: &[&str], counts: &[u64]) -> TimeSeriesSnapshot {
        TimeSeriesSnapshot {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            counts: counts.to_vec(),
        }
    }

    #[test]
    fn test_first_snapshot_builds_single_series() {
        let mut view = TimeSeriesChartView::new();
        view.update(&snapshot(&["2024-05-01 10:00", "2024-05-01 10:01"], &[2, 7]));

        let chart = view.chart().unwrap();
        assert_eq!(chart.kind(), ChartKind::Line);
        assert_eq!(chart.datasets().len(), 1);
        assert_eq!(chart.datasets()[0].label, "Alerts Over Time");
        assert_eq!(chart.datasets()[0].data, vec![2.0, 7.0]);
        assert_eq!(chart.labels().len(), 2);
    }

    #[test]
    fn test_update_replaces_labels_and_values_in_place() {
        let mut view = TimeSeriesChartView::new();
        view.update(&snapshot(&["10:00"], &[1]));
        let id = view.chart().unwrap().id();

        view.update(&snapshot(&["10:00", "10:01", "10:02"], &[1, 4, 2]));
        view.update(&snapshot(&["10:01", "10:02"], &[4, 3]));

        let chart = view.chart().unwrap();
        assert_eq!(chart.id(), id);
        assert_eq!(chart.revision(), 2);
        assert_eq!(chart.labels(), &["10:01".to_string(), "10:02".to_string()]);
        assert_eq!(chart.datasets()[0].data, vec![4.0, 3.0]);
    }
}
