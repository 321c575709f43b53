//! Map view
//!
//! One persistent [`MapCanvas`] plus a [`MarkerRegistry`] keyed by source
//! address, and a side list of alert entries. Selecting an entry centers the
//! map on it, opens its popup and moves the single highlight to its marker.

pub mod canvas;
pub mod markers;

pub use canvas::MapCanvas;
pub use markers::{plan_markers, HighlightState, Marker, MarkerIcon, MarkerRegistry};

use egui::{RichText, Ui};
use uuid::Uuid;

use aw_core::{GeoPoint, Resource};
use aw_data::MapConfig;

use crate::{DashboardView, ViewAction, ViewId};

/// Lifecycle of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    Uninitialized,
    /// Map constructed, no marker yet
    Empty,
    /// Map constructed with at least one marker
    Populated,
}

/// One clickable entry of the side list
#[derive(Debug, Clone, PartialEq)]
pub struct AlertListEntry {
    pub label: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AlertListEntry {
    pub fn from_point(point: &GeoPoint) -> Self {
        Self {
            label: format!("{} from {}", point.alert_message, point.source_address),
            address: point.source_address.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// First point whose address occurs in `alert_text`
pub fn match_alert_to_point<'a>(alert_text: &str, points: &'a [GeoPoint]) -> Option<&'a GeoPoint> {
    points.iter().find(|p| alert_text.contains(p.source_address.as_str()))
}

pub struct MapView {
    id: ViewId,
    title: String,
    config: MapConfig,

    canvas: Option<MapCanvas>,
    markers: MarkerRegistry,
    highlight: HighlightState,
    entries: Vec<AlertListEntry>,
    /// Points of the last sync, used to locate table alerts
    points: Vec<GeoPoint>,
}

impl MapView {
    pub fn new(config: MapConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Threat Map".to_string(),
            config,
            canvas: None,
            markers: MarkerRegistry::new(),
            highlight: HighlightState::default(),
            entries: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Construct the map. Only the first call has an effect.
    pub fn init(&mut self) -> bool {
        if self.canvas.is_some() {
            return false;
        }
        self.canvas = Some(MapCanvas::new(self.config.clone()));
        tracing::debug!("Map initialized");
        true
    }

    pub fn state(&self) -> MapState {
        match &self.canvas {
            None => MapState::Uninitialized,
            Some(_) if self.markers.is_empty() => MapState::Empty,
            Some(_) => MapState::Populated,
        }
    }

    /// Add markers for addresses not seen before. Returns how many were added.
    pub fn sync(&mut self, points: &[GeoPoint]) -> usize {
        self.init();
        let mut added = 0;
        for marker in plan_markers(&self.markers, points) {
            if self.markers.insert_new(marker) {
                added += 1;
            }
        }
        self.points = points.to_vec();
        if added > 0 {
            tracing::debug!("Added {} map markers, {} total", added, self.markers.len());
        }
        added
    }

    /// Replace the side list
    pub fn render_alert_list(&mut self, points: &[GeoPoint]) {
        self.entries = points.iter().map(AlertListEntry::from_point).collect();
    }

    /// Reconcile a geo snapshot
    pub fn apply(&mut self, points: &[GeoPoint]) {
        self.sync(points);
        self.render_alert_list(points);
    }

    /// Handle a click on side list entry `index`
    pub fn select_entry(&mut self, index: usize) -> bool {
        let Some(entry) = self.entries.get(index).cloned() else {
            return false;
        };
        self.focus(&entry.address, entry.latitude, entry.longitude);
        true
    }

    /// Focus the map on the point matching an alert's text, if any
    pub fn focus_alert(&mut self, alert_text: &str) -> bool {
        let Some(point) = match_alert_to_point(alert_text, &self.points).cloned() else {
            tracing::debug!("No map point for alert '{}'", alert_text);
            return false;
        };
        self.focus(&point.source_address, point.latitude, point.longitude);
        true
    }

    fn focus(&mut self, address: &str, latitude: f64, longitude: f64) {
        self.init();
        let highlighted = self.highlight.switch_to(&mut self.markers, address);
        if let Some(canvas) = &mut self.canvas {
            canvas.set_view(latitude, longitude, self.config.focus_zoom);
            if highlighted {
                canvas.set_open_popup(Some(address.to_string()));
            }
        }
    }

    /// Open the popup of a clicked marker. The highlight is left as is.
    pub fn open_marker(&mut self, address: &str) -> bool {
        if !self.markers.contains(address) {
            return false;
        }
        let Some(canvas) = &mut self.canvas else {
            return false;
        };
        tracing::debug!("Opened marker {}", address);
        canvas.set_open_popup(Some(address.to_string()));
        true
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    pub fn entries(&self) -> &[AlertListEntry] {
        &self.entries
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlight.current()
    }

    pub fn canvas(&self) -> Option<&MapCanvas> {
        self.canvas.as_ref()
    }
}

impl DashboardView for MapView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }

    fn view_type(&self) -> &str {
        "MapView"
    }

    fn resource(&self) -> Resource {
        Resource::Geo
    }

    fn ui(&mut self, ui: &mut Ui, _actions: &mut Vec<ViewAction>) {
        let mut selected = None;
        let highlighted = self.highlight.current().map(str::to_string);

        egui::SidePanel::left(egui::Id::new(("map_alert_list", self.id)))
            .resizable(true)
            .default_width(220.0)
            .show_inside(ui, |ui| {
                ui.strong("Alerts");
                ui.separator();
                if self.entries.is_empty() {
                    ui.label(RichText::new("No located alerts").weak());
                }
                egui::ScrollArea::vertical()
                    .id_source(("map_alert_scroll", self.id))
                    .show(ui, |ui| {
                        for (index, entry) in self.entries.iter().enumerate() {
                            let active = highlighted.as_deref() == Some(entry.address.as_str());
                            if ui.selectable_label(active, entry.label.as_str()).clicked() {
                                selected = Some(index);
                            }
                        }
                    });
            });

        let mut clicked_marker = None;
        egui::CentralPanel::default().show_inside(ui, |ui| match &mut self.canvas {
            Some(canvas) => {
                clicked_marker = canvas.ui(ui, &self.markers);
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Map not initialized").weak());
                });
            }
        });

        if let Some(address) = clicked_marker {
            self.open_marker(&address);
        }
        if let Some(index) = selected {
            self.select_entry(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ip: &str, lat: f64, lon: f64, alert: &str) -> GeoPoint {
        GeoPoint {
            source_address: ip.to_string(),
            latitude: lat,
            longitude: lon,
            alert_message: alert.to_string(),
        }
    }

    fn sample() -> Vec<GeoPoint> {
        vec![
            point("10.0.0.5", 48.85, 2.35, "Brute Force attempt detected"),
            point("192.168.1.7", 35.68, 139.69, "SYN Flood detected"),
        ]
    }

    #[test]
    fn test_state_machine() {
        let mut map = MapView::new(MapConfig::default());
        assert_eq!(map.state(), MapState::Uninitialized);

        assert!(map.init());
        assert!(!map.init());
        assert_eq!(map.state(), MapState::Empty);

        map.sync(&sample());
        assert_eq!(map.state(), MapState::Populated);
    }

    #[test]
    fn test_sync_initializes_lazily() {
        let mut map = MapView::new(MapConfig::default());
        map.sync(&[]);
        assert_eq!(map.state(), MapState::Empty);
    }

    #[test]
    fn test_repeated_sync_adds_no_duplicates() {
        let mut map = MapView::new(MapConfig::default());
        assert_eq!(map.sync(&sample()), 2);

        let mut next = sample();
        next.push(point("172.16.0.3", -33.86, 151.2, "ICMP Ping detected"));
        assert_eq!(map.sync(&next), 1);
        assert_eq!(map.markers().len(), 3);
    }

    #[test]
    fn test_alert_list_is_replaced() {
        let mut map = MapView::new(MapConfig::default());
        map.apply(&sample());
        assert_eq!(map.entries().len(), 2);
        assert_eq!(map.entries()[0].label, "Brute Force attempt detected from 10.0.0.5");

        map.apply(&sample()[1..]);
        assert_eq!(map.entries().len(), 1);
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn test_match_alert_to_point() {
        let points = sample();
        let found = match_alert_to_point("Brute force attack from 10.0.0.5", &points);
        assert_eq!(found.map(|p| p.source_address.as_str()), Some("10.0.0.5"));

        assert!(match_alert_to_point("Brute force attack from 203.0.113.1", &points).is_none());
    }

    #[test]
    fn test_match_prefers_first_point() {
        // "10.0.0.1" is a substring of "10.0.0.12", so both match
        let points = vec![
            point("10.0.0.1", 1.0, 1.0, "a"),
            point("10.0.0.12", 2.0, 2.0, "b"),
        ];
        let found = match_alert_to_point("SYN Flood detected 10.0.0.12 High", &points).unwrap();
        assert_eq!(found.source_address, "10.0.0.1");
    }

    #[test]
    fn test_select_entry_focuses_and_highlights() {
        let mut map = MapView::new(MapConfig::default());
        map.apply(&sample());

        assert!(map.select_entry(0));
        assert!(map.select_entry(1));

        assert_eq!(map.markers().get("10.0.0.5").unwrap().icon, MarkerIcon::Default);
        assert_eq!(map.markers().get("192.168.1.7").unwrap().icon, MarkerIcon::Highlighted);
        assert_eq!(map.highlighted(), Some("192.168.1.7"));

        let canvas = map.canvas().unwrap();
        assert_eq!(canvas.center(), [35.68, 139.69]);
        assert_eq!(canvas.zoom(), 6.0);
        assert_eq!(canvas.open_popup(), Some("192.168.1.7"));

        assert!(!map.select_entry(5));
    }

    #[test]
    fn test_clicked_marker_opens_its_popup() {
        let mut map = MapView::new(MapConfig::default());
        map.apply(&sample());
        map.select_entry(0);

        assert!(map.open_marker("192.168.1.7"));
        assert_eq!(map.canvas().unwrap().open_popup(), Some("192.168.1.7"));
        assert_eq!(map.highlighted(), Some("10.0.0.5"));

        assert!(!map.open_marker("203.0.113.1"));
        assert_eq!(map.canvas().unwrap().open_popup(), Some("192.168.1.7"));
    }

    #[test]
    fn test_focus_alert_uses_last_points() {
        let mut map = MapView::new(MapConfig::default());
        map.apply(&sample());

        assert!(map.focus_alert("SYN Flood detected 192.168.1.7 High Tokyo, Japan"));
        assert_eq!(map.highlighted(), Some("192.168.1.7"));

        assert!(!map.focus_alert("ICMP Ping detected 8.8.8.8 Low Unknown"));
        assert_eq!(map.highlighted(), Some("192.168.1.7"));
    }
}
