//! Chart views
//!
//! Each chart view owns one [`ChartModel`], built from the first snapshot and
//! mutated in place afterwards. The model id never changes once built; only
//! the labels, dataset values and the redraw revision do.

pub mod severity;
pub mod timeline;

pub use severity::SeverityChartView;
pub use timeline::TimeSeriesChartView;

use egui::Color32;
use uuid::Uuid;

use aw_core::Severity;

/// Identity of a constructed chart
pub type ChartId = Uuid;

/// Bar colors, fixed per severity
pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::High => Color32::from_rgb(220, 38, 38),    // Red
        Severity::Medium => Color32::from_rgb(255, 165, 0),  // Orange
        Severity::Low => Color32::from_rgb(250, 204, 21),    // Yellow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

/// One named series of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub color: Color32,
}

/// Chart state that survives across snapshots
#[derive(Debug, Clone)]
pub struct ChartModel {
    id: ChartId,
    kind: ChartKind,
    labels: Vec<String>,
    datasets: Vec<Dataset>,
    revision: u64,
}

impl ChartModel {
    pub fn new(kind: ChartKind, labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            labels,
            datasets,
            revision: 0,
        }
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Number of redraws since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// Replace the values of one dataset. Returns false for an unknown index.
    pub fn set_data(&mut self, index: usize, data: Vec<f64>) -> bool {
        match self.datasets.get_mut(index) {
            Some(dataset) => {
                dataset.data = data;
                true
            }
            None => false,
        }
    }

    /// Mark the chart for redraw
    pub fn update(&mut self) {
        self.revision += 1;
    }
}
