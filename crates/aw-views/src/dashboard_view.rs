//! Dashboard view abstraction - base trait for all dockable views

use egui::Ui;
use uuid::Uuid;

use aw_core::Resource;

/// Unique identifier for a dashboard view
pub type ViewId = Uuid;

/// Cross-view request raised while drawing a view.
///
/// Views never reach into each other; the [`crate::Dashboard`] routes these
/// after the frame is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Center the map on the geo point whose address appears in this text
    LocateOnMap(String),
}

/// Base trait for all dashboard views (table, charts, map)
pub trait DashboardView {
    /// Get the unique ID of this view
    fn id(&self) -> ViewId;

    /// Get the display name
    fn display_name(&self) -> &str;

    /// Get the view type
    fn view_type(&self) -> &str;

    /// Backend resource whose snapshots this view reconciles
    fn resource(&self) -> Resource;

    /// Draw the UI, pushing any cross-view requests into `actions`
    fn ui(&mut self, ui: &mut Ui, actions: &mut Vec<ViewAction>);
}
