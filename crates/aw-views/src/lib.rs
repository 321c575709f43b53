//! Dashboard views: alert table, severity and time series charts, threat map

pub mod charts;
pub mod dashboard;
pub mod dashboard_view;
pub mod map;
pub mod tables;
pub mod viewport;

// Re-exports
pub use charts::{ChartKind, ChartModel, Dataset, SeverityChartView, TimeSeriesChartView};
pub use dashboard::Dashboard;
pub use dashboard_view::{DashboardView, ViewAction, ViewId};
pub use map::{match_alert_to_point, MapState, MapView};
pub use tables::{page_rows, AlertRow, AlertTableView};
pub use viewport::{DashboardTab, Viewport};
