//! Dashboard configuration
//!
//! Stored as JSON. Every field has a default, so a partial file (or no file
//! at all) yields a working configuration pointed at a local backend.

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::DataError;

/// Environment variable holding the config file path
pub const CONFIG_ENV: &str = "ALERTWATCH_CONFIG";

/// Environment variable overriding the backend base URL
pub const URL_ENV: &str = "ALERTWATCH_URL";

/// Highest latitude the Web Mercator map can show
pub const MAX_MAP_LATITUDE: f64 = 85.05;

/// Top-level dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend base URL, endpoint paths are appended to it
    pub base_url: String,

    /// Poll period of every resource, humantime syntax ("5s", "1500ms")
    pub poll_interval: String,

    /// Optional per-request timeout; unset means a stalled fetch waits forever
    pub request_timeout: Option<String>,

    /// Alerts per table page
    pub page_size: usize,

    /// Use the in-process demo backend instead of HTTP
    pub demo: bool,

    /// Map view settings
    pub map: MapConfig,
}

/// Map viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial center as [latitude, longitude]
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom applied when an alert entry is selected
    pub focus_zoom: f64,
    /// Panning is bounded to +/- this latitude
    pub max_latitude: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval: "5s".to_string(),
            request_timeout: None,
            page_size: aw_core::DEFAULT_PAGE_SIZE,
            demo: false,
            map: MapConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [20.0, 0.0],
            zoom: 2.0,
            min_zoom: 2.0,
            max_zoom: 18.0,
            focus_zoom: 6.0,
            max_latitude: 85.0,
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, DataError> {
    humantime::parse_duration(value).map_err(|source| DataError::Duration {
        value: value.to_string(),
        source,
    })
}

impl DashboardConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Resolve the configuration from an optional file and URL override.
    /// A path that does not exist falls back to the defaults.
    pub fn resolve(path: Option<PathBuf>, url_override: Option<String>) -> Result<Self, DataError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from {}", path.display());
                Self::load(&path)?
            }
            Some(path) => {
                tracing::warn!("Configuration file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        if let Some(url) = url_override.filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve from `ALERTWATCH_CONFIG` (or the first CLI argument) and `ALERTWATCH_URL`
    pub fn from_env() -> Result<Self, DataError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| std::env::args_os().nth(1).map(PathBuf::from));
        let url = std::env::var(URL_ENV).ok();
        Self::resolve(path, url)
    }

    pub fn poll_interval(&self) -> Result<Duration, DataError> {
        parse_duration(&self.poll_interval)
    }

    pub fn request_timeout(&self) -> Result<Option<Duration>, DataError> {
        self.request_timeout.as_deref().map(parse_duration).transpose()
    }

    /// Check the values the scheduler and views rely on
    pub fn validate(&self) -> Result<(), DataError> {
        if self.poll_interval()?.is_zero() {
            return Err(DataError::Invalid("poll_interval must be greater than zero".to_string()));
        }
        self.request_timeout()?;

        if self.page_size == 0 {
            return Err(DataError::Invalid("page_size must be at least 1".to_string()));
        }

        if !self.demo && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DataError::Invalid(format!("base_url '{}' is not an http(s) URL", self.base_url)));
        }

        let map = &self.map;
        if map.min_zoom > map.max_zoom {
            return Err(DataError::Invalid("map.min_zoom exceeds map.max_zoom".to_string()));
        }
        if !(0.0..=MAX_MAP_LATITUDE).contains(&map.max_latitude) {
            return Err(DataError::Invalid(format!(
                "map.max_latitude must be within [0, {}]",
                MAX_MAP_LATITUDE
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.poll_interval().unwrap(), Duration::from_millis(5000));
        assert_eq!(config.request_timeout().unwrap(), None);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.map.center, [20.0, 0.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{"base_url": "http://ids.local:5000", "poll_interval": "1500ms", "map": {"focus_zoom": 8}}"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://ids.local:5000");
        assert_eq!(config.poll_interval().unwrap(), Duration::from_millis(1500));
        assert_eq!(config.map.focus_zoom, 8.0);
        assert_eq!(config.map.max_zoom, 18.0);
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_invalid_values() {
        let config = DashboardConfig { poll_interval: "soon".to_string(), ..Default::default() };
        assert!(matches!(config.validate(), Err(DataError::Duration { .. })));

        let config = DashboardConfig { poll_interval: "0s".to_string(), ..Default::default() };
        assert!(matches!(config.validate(), Err(DataError::Invalid(_))));

        let config = DashboardConfig { page_size: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = DashboardConfig { base_url: "ids.local".to_string(), ..Default::default() };
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.map.max_latitude = 90.0;
        assert!(matches!(config.validate(), Err(DataError::Invalid(_))));
        config.map.max_latitude = 85.05;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_and_round_trip() {
        let dir = std::env::temp_dir().join(format!("alertwatch-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dashboard.json");

        let config = DashboardConfig {
            request_timeout: Some("2s".to_string()),
            page_size: 10,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = DashboardConfig::resolve(Some(path.clone()), Some("https://soc.example".to_string())).unwrap();
        assert_eq!(loaded.page_size, 10);
        assert_eq!(loaded.request_timeout().unwrap(), Some(Duration::from_secs(2)));
        assert_eq!(loaded.base_url, "https://soc.example");

        let missing = DashboardConfig::resolve(Some(dir.join("missing.json")), None).unwrap();
        assert_eq!(missing, DashboardConfig::default());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
