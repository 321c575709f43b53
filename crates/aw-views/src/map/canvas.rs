//! Map canvas - Web Mercator viewport drawn with the egui painter

use std::f64::consts::PI;

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use aw_data::MapConfig;

use super::markers::{MarkerIcon, MarkerRegistry};

const TILE_SIZE: f64 = 256.0;
const MARKER_RADIUS: f32 = 5.0;
const HIGHLIGHT_RADIUS: f32 = 8.0;

const WATER: Color32 = Color32::from_rgb(230, 240, 250);
const GRID: Color32 = Color32::from_rgb(200, 210, 225);
const MARKER: Color32 = Color32::from_rgb(37, 99, 235);
const MARKER_HIGHLIGHT: Color32 = Color32::from_rgb(220, 38, 38);

/// Latitude where the Web Mercator world becomes square
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// World pixel coordinates of a lat/lon at `zoom`.
/// Latitudes beyond [`MAX_MERCATOR_LATITUDE`] are clamped.
pub fn project(latitude: f64, longitude: f64, zoom: f64) -> [f64; 2] {
    let size = TILE_SIZE * 2f64.powf(zoom);
    let lat = latitude
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    let x = (longitude + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    [x, y]
}

/// Inverse of [`project`]
pub fn unproject(x: f64, y: f64, zoom: f64) -> [f64; 2] {
    let size = TILE_SIZE * 2f64.powf(zoom);
    let longitude = x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * y / size);
    let latitude = n.sinh().atan().to_degrees();
    [latitude, longitude]
}

/// Pannable, zoomable map surface
pub struct MapCanvas {
    center: [f64; 2],
    zoom: f64,
    config: MapConfig,
    open_popup: Option<String>,
}

impl MapCanvas {
    pub fn new(config: MapConfig) -> Self {
        let mut canvas = Self {
            center: [0.0, 0.0],
            zoom: config.zoom,
            config,
            open_popup: None,
        };
        canvas.set_view(canvas.config.center[0], canvas.config.center[1], canvas.config.zoom);
        canvas
    }

    /// Current center as [latitude, longitude]
    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn open_popup(&self) -> Option<&str> {
        self.open_popup.as_deref()
    }

    pub fn set_open_popup(&mut self, address: Option<String>) {
        self.open_popup = address;
    }

    /// Move the view, clamped to the configured bounds
    pub fn set_view(&mut self, latitude: f64, longitude: f64, zoom: f64) {
        let max_lat = self.config.max_latitude;
        self.center = [latitude.clamp(-max_lat, max_lat), longitude.clamp(-180.0, 180.0)];
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
    }

    pub fn pan_by_pixels(&mut self, delta: Vec2) {
        let [x, y] = project(self.center[0], self.center[1], self.zoom);
        let [lat, lon] = unproject(x - delta.x as f64, y - delta.y as f64, self.zoom);
        self.set_view(lat, lon, self.zoom);
    }

    pub fn zoom_by(&mut self, steps: f64) {
        self.set_view(self.center[0], self.center[1], self.zoom + steps);
    }

    fn to_screen(&self, rect: Rect, latitude: f64, longitude: f64) -> Pos2 {
        let [cx, cy] = project(self.center[0], self.center[1], self.zoom);
        let [x, y] = project(latitude, longitude, self.zoom);
        rect.center() + Vec2::new((x - cx) as f32, (y - cy) as f32)
    }

    /// Draw the map and its markers. Returns the address of a clicked marker;
    /// a click on empty space closes the open popup.
    pub fn ui(&mut self, ui: &mut Ui, registry: &MarkerRegistry) -> Option<String> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        if response.dragged() {
            self.pan_by_pixels(response.drag_delta());
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.scroll_delta.y);
            if scroll_delta != 0.0 {
                self.zoom_by(scroll_delta as f64 / 100.0);
            }
        }

        let mut clicked = None;
        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                clicked = self.marker_at(rect, registry, pointer);
                if clicked.is_none() {
                    self.open_popup = None;
                }
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, Rounding::ZERO, WATER);
        self.draw_graticule(&painter, rect);

        for marker in registry.iter() {
            let pos = self.to_screen(rect, marker.latitude, marker.longitude);
            if !rect.expand(HIGHLIGHT_RADIUS).contains(pos) {
                continue;
            }
            let (radius, color) = match marker.icon {
                MarkerIcon::Default => (MARKER_RADIUS, MARKER),
                MarkerIcon::Highlighted => (HIGHLIGHT_RADIUS, MARKER_HIGHLIGHT),
            };
            painter.circle_filled(pos, radius, color);
            painter.circle_stroke(pos, radius, Stroke::new(1.0, Color32::WHITE));
        }

        if let Some(marker) = self.open_popup.as_deref().and_then(|a| registry.get(a)) {
            let anchor = self.to_screen(rect, marker.latitude, marker.longitude);
            let font = FontId::proportional(12.0);
            let size = ui.fonts(|f| f.layout_no_wrap(marker.popup.clone(), font.clone(), Color32::BLACK).size());
            let padding = Vec2::splat(6.0);
            let min = anchor - Vec2::new(size.x / 2.0, size.y + HIGHLIGHT_RADIUS + 4.0) - padding;
            let popup_rect = Rect::from_min_size(min, size + padding * 2.0);

            painter.rect(popup_rect, Rounding::same(4.0), Color32::WHITE, Stroke::new(1.0, Color32::GRAY));
            painter.text(popup_rect.min + padding, Align2::LEFT_TOP, &marker.popup, font, Color32::BLACK);
        }

        clicked
    }

    fn marker_at(&self, rect: Rect, registry: &MarkerRegistry, pointer: Pos2) -> Option<String> {
        registry
            .iter()
            .map(|m| (m, self.to_screen(rect, m.latitude, m.longitude).distance(pointer)))
            .filter(|(_, distance)| *distance <= HIGHLIGHT_RADIUS + 3.0)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m.address.clone())
    }

    fn draw_graticule(&self, painter: &egui::Painter, rect: Rect) {
        let stroke = Stroke::new(0.5, GRID);
        let max_lat = self.config.max_latitude;

        for lat in (-60..=60).step_by(30) {
            let start = self.to_screen(rect, lat as f64, -180.0);
            let end = self.to_screen(rect, lat as f64, 180.0);
            painter.line_segment([start, end], stroke);
        }

        for lon in (-180..=180).step_by(30) {
            let start = self.to_screen(rect, max_lat, lon as f64);
            let end = self.to_screen(rect, -max_lat, lon as f64);
            painter.line_segment([start, end], stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_origin_is_world_center() {
        let [x, y] = project(0.0, 0.0, 0.0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);

        let [lat, lon] = unproject(x, y, 0.0);
        assert!(lat.abs() < 1e-9 && lon.abs() < 1e-9);
    }

    #[test]
    fn test_poles_project_to_finite_edges() {
        for latitude in [90.0, -90.0, 89.999] {
            let [x, y] = project(latitude, 0.0, 2.0);
            assert!(x.is_finite() && y.is_finite(), "{latitude} projected to ({x}, {y})");
        }
        let [_, north] = project(90.0, 0.0, 0.0);
        assert!(north.abs() < 1e-6);
        let [_, south] = project(-90.0, 0.0, 0.0);
        assert!((south - TILE_SIZE).abs() < 1e-6);
    }

    #[test]
    fn test_initial_view_from_config() {
        let canvas = MapCanvas::new(MapConfig::default());
        assert_eq!(canvas.center(), [20.0, 0.0]);
        assert_eq!(canvas.zoom(), 2.0);
        assert!(canvas.open_popup().is_none());
    }

    #[test]
    fn test_view_is_clamped() {
        let mut canvas = MapCanvas::new(MapConfig::default());
        canvas.set_view(89.0, 200.0, 30.0);
        assert_eq!(canvas.center(), [85.0, 180.0]);
        assert_eq!(canvas.zoom(), 18.0);

        canvas.zoom_by(-40.0);
        assert_eq!(canvas.zoom(), 2.0);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut canvas = MapCanvas::new(MapConfig::default());
        canvas.set_view(0.0, 0.0, 2.0);
        // Dragging the map right reveals what lies west
        canvas.pan_by_pixels(Vec2::new(100.0, 0.0));
        assert!(canvas.center()[1] < 0.0);
        assert!(canvas.center()[0].abs() < 1e-9);
    }
}
