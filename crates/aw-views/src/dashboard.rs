//! The four dashboard views and the routing of snapshots between them

use aw_core::Snapshot;
use aw_data::DashboardConfig;

use crate::viewport::DashboardTab;
use crate::{
    AlertTableView, DashboardView, MapView, SeverityChartView, TimeSeriesChartView, ViewAction,
};

/// Owns every view. Built once at startup and only touched from the UI thread.
pub struct Dashboard {
    pub table: AlertTableView,
    pub severity: SeverityChartView,
    pub timeline: TimeSeriesChartView,
    pub map: MapView,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig) -> Self {
        let mut map = MapView::new(config.map.clone());
        map.init();

        Self {
            table: AlertTableView::new(config.page_size),
            severity: SeverityChartView::new(),
            timeline: TimeSeriesChartView::new(),
            map,
        }
    }

    /// Reconcile a snapshot into the view that owns its resource
    pub fn apply(&mut self, snapshot: Snapshot) {
        tracing::trace!("Applying {} snapshot", snapshot.resource());
        match snapshot {
            Snapshot::Alerts(alerts) => self.table.replace_alerts(alerts),
            Snapshot::Severity(counts) => self.severity.update(&counts),
            Snapshot::TimeSeries(series) => self.timeline.update(&series),
            Snapshot::Geo(points) => self.map.apply(&points),
        }
    }

    pub fn handle_action(&mut self, action: ViewAction) {
        match action {
            ViewAction::LocateOnMap(text) => {
                self.map.focus_alert(&text);
            }
        }
    }

    pub fn view_mut(&mut self, tab: DashboardTab) -> &mut dyn DashboardView {
        match tab {
            DashboardTab::Alerts => &mut self.table,
            DashboardTab::Severity => &mut self.severity,
            DashboardTab::Timeline => &mut self.timeline,
            DashboardTab::Map => &mut self.map,
        }
    }

    pub fn view(&self, tab: DashboardTab) -> &dyn DashboardView {
        match tab {
            DashboardTab::Alerts => &self.table,
            DashboardTab::Severity => &self.severity,
            DashboardTab::Timeline => &self.timeline,
            DashboardTab::Map => &self.map,
        }
    }
}
