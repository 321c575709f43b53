//! Viewport - docks the four dashboard views in a grid

use egui::Ui;
use egui_dock::{DockArea, DockState, NodeIndex, TabViewer};

use crate::{Dashboard, ViewAction};

/// One dockable tab per dashboard view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardTab {
    Alerts,
    Severity,
    Timeline,
    Map,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Alerts,
        DashboardTab::Severity,
        DashboardTab::Timeline,
        DashboardTab::Map,
    ];
}

/// Dock layout of the dashboard
pub struct Viewport {
    dock_state: DockState<DashboardTab>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            dock_state: create_grid_dock_state(),
        }
    }

    /// Restore the default grid
    pub fn reset_layout(&mut self) {
        self.dock_state = create_grid_dock_state();
    }

    /// Draw the viewport, then route the actions raised by the views
    pub fn ui(&mut self, ui: &mut Ui, dashboard: &mut Dashboard) {
        let mut actions = Vec::new();

        DockArea::new(&mut self.dock_state)
            .show_close_buttons(false)
            .draggable_tabs(true)
            .show_inside(ui, &mut ViewportTabViewer {
                dashboard: &mut *dashboard,
                actions: &mut actions,
            });

        for action in actions {
            dashboard.handle_action(action);
        }
    }
}

/// Tab viewer for egui_dock
struct ViewportTabViewer<'a> {
    dashboard: &'a mut Dashboard,
    actions: &'a mut Vec<ViewAction>,
}

impl<'a> TabViewer for ViewportTabViewer<'a> {
    type Tab = DashboardTab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        self.dashboard.view(*tab).display_name().into()
    }

    fn ui(&mut self, ui: &mut Ui, tab: &mut Self::Tab) {
        self.dashboard.view_mut(*tab).ui(ui, self.actions);
    }
}

/// Table and map on top, charts below them
fn create_grid_dock_state() -> DockState<DashboardTab> {
    let mut dock_state = DockState::new(vec![DashboardTab::Alerts]);
    let surface = dock_state.main_surface_mut();

    let [left, right] = surface.split_right(NodeIndex::root(), 0.5, vec![DashboardTab::Map]);
    surface.split_below(left, 0.6, vec![DashboardTab::Severity]);
    surface.split_below(right, 0.6, vec![DashboardTab::Timeline]);

    dock_state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_holds_every_tab() {
        let mut viewport = Viewport::new();
        viewport.reset_layout();
        for tab in DashboardTab::ALL {
            assert!(viewport.dock_state.find_tab(&tab).is_some(), "{tab:?} missing");
        }
    }
}
