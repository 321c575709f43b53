//! Marker registry and highlight state

use indexmap::IndexMap;

use aw_core::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerIcon {
    #[default]
    Default,
    Highlighted,
}

/// A map annotation tied to one source address
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub popup: String,
    pub icon: MarkerIcon,
}

impl Marker {
    pub fn from_point(point: &GeoPoint) -> Self {
        Self {
            address: point.source_address.clone(),
            latitude: point.latitude,
            longitude: point.longitude,
            popup: popup_text(point),
            icon: MarkerIcon::Default,
        }
    }
}

/// Popup body shown when a marker is opened
pub fn popup_text(point: &GeoPoint) -> String {
    format!("{}\nSource: {}", point.alert_message, point.source_address)
}

/// Markers keyed by source address, in first-seen order.
///
/// Entries are only ever added. A later point for a known address does not
/// move or replace its marker.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: IndexMap<String, Marker>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `marker` unless its address is already known.
    /// Returns true when the marker was added.
    pub fn insert_new(&mut self, marker: Marker) -> bool {
        if self.markers.contains_key(&marker.address) {
            return false;
        }
        self.markers.insert(marker.address.clone(), marker);
        true
    }

    pub fn contains(&self, address: &str) -> bool {
        self.markers.contains_key(address)
    }

    pub fn get(&self, address: &str) -> Option<&Marker> {
        self.markers.get(address)
    }

    fn set_icon(&mut self, address: &str, icon: MarkerIcon) -> bool {
        match self.markers.get_mut(address) {
            Some(marker) => {
                marker.icon = icon;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Markers to create for `points`: one per address not yet in `registry`,
/// first occurrence wins within the batch.
pub fn plan_markers(registry: &MarkerRegistry, points: &[GeoPoint]) -> Vec<Marker> {
    let mut planned: IndexMap<&str, Marker> = IndexMap::new();
    for point in points {
        let address = point.source_address.as_str();
        if registry.contains(address) || planned.contains_key(address) {
            continue;
        }
        planned.insert(address, Marker::from_point(point));
    }
    planned.into_values().collect()
}

/// The single highlighted marker, if any
#[derive(Debug, Default)]
pub struct HighlightState {
    current: Option<String>,
}

impl HighlightState {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Reset the previous marker's icon, then highlight `address`.
    /// Returns false if `address` has no marker; nothing changes then.
    pub fn switch_to(&mut self, registry: &mut MarkerRegistry, address: &str) -> bool {
        if !registry.contains(address) {
            return false;
        }
        if let Some(previous) = self.current.take() {
            registry.set_icon(&previous, MarkerIcon::Default);
        }
        registry.set_icon(address, MarkerIcon::Highlighted);
        self.current = Some(address.to_string());
        true
    }
}
