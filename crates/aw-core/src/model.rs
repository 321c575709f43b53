//! Resource model
//!
//! Every type here mirrors one backend payload. Field names follow the Rust
//! side; serde renames map them onto the wire names.

use std::fmt;
use serde::de::{self, DeserializeOwned};
use serde::{Serialize, Deserialize};
use serde_json::Value;

/// Threat severity as classified by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    /// Chart order
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "alert")]
    pub message: String,

    /// Source IP, the map identity of the alert
    #[serde(rename = "ip")]
    pub source_address: String,

    pub severity: Severity,

    pub location: String,
}

/// Alert counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySnapshot {
    #[serde(rename = "High")]
    pub high: u64,
    #[serde(rename = "Medium")]
    pub medium: u64,
    #[serde(rename = "Low")]
    pub low: u64,
}

impl SeveritySnapshot {
    /// Counts in `Severity::ALL` order
    pub fn values(&self) -> [u64; 3] {
        [self.high, self.medium, self.low]
    }

    pub fn count(&self, severity: Severity) -> u64 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Alert counts per time bucket.
///
/// `labels` and `counts` are expected to have the same length. The backend
/// guarantees it; nothing on this side checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesSnapshot {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

/// Geolocated alert used to place map markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "ip")]
    pub source_address: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "alert")]
    pub alert_message: String,
}

/// The four independently polled backend resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Alerts,
    Severity,
    TimeSeries,
    Geo,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Alerts,
        Resource::Severity,
        Resource::TimeSeries,
        Resource::Geo,
    ];

    /// Endpoint path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Alerts => "/alerts",
            Resource::Severity => "/chart_data",
            Resource::TimeSeries => "/alerts_over_time",
            Resource::Geo => "/map_data",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Resource::Alerts => "alerts",
            Resource::Severity => "severity",
            Resource::TimeSeries => "time series",
            Resource::Geo => "geo",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Most recently fetched value of one resource
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Alerts(Vec<Alert>),
    Severity(SeveritySnapshot),
    TimeSeries(TimeSeriesSnapshot),
    Geo(Vec<GeoPoint>),
}

impl Snapshot {
    pub fn resource(&self) -> Resource {
        match self {
            Snapshot::Alerts(_) => Resource::Alerts,
            Snapshot::Severity(_) => Resource::Severity,
            Snapshot::TimeSeries(_) => Resource::TimeSeries,
            Snapshot::Geo(_) => Resource::Geo,
        }
    }

    /// Decode a JSON payload for the given resource.
    ///
    /// Records must be JSON objects. Derived struct deserializers would also
    /// accept an array in field order, which the backend never sends.
    pub fn decode(resource: Resource, payload: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(payload)?;
        Ok(match resource {
            Resource::Alerts => Snapshot::Alerts(records(value)?),
            Resource::Severity => Snapshot::Severity(record(value)?),
            Resource::TimeSeries => Snapshot::TimeSeries(record(value)?),
            Resource::Geo => Snapshot::Geo(records(value)?),
        })
    }
}

fn record<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    if !value.is_object() {
        return Err(de::Error::invalid_type(unexpected(&value), &"a JSON object"));
    }
    serde_json::from_value(value)
}

fn records<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(items) => items.into_iter().map(record).collect(),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a JSON array of objects")),
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}
