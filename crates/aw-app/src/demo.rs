//! Demo mode for the alert dashboard
//! Simulates an intrusion detection backend in-process

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use aw_core::{
    Alert, DataSource, FetchError, GeoPoint, Resource, Severity, SeveritySnapshot, Snapshot,
    TimeSeriesSnapshot,
};

/// Signatures the simulated sensor reports
const DETECTIONS: [&str; 4] = [
    "ARP Spoofing detected",
    "SYN Flood detected",
    "Brute Force attempt detected",
    "ICMP Ping detected",
];

/// Simulated sources and where they geolocate to
const KNOWN_HOSTS: [(&str, &str, f64, f64); 6] = [
    ("185.220.101.4", "Berlin, Germany", 52.52, 13.405),
    ("45.155.205.233", "Moscow, Russia", 55.7558, 37.6173),
    ("103.75.190.12", "Singapore, Singapore", 1.3521, 103.8198),
    ("198.51.100.23", "New York, United States", 40.7128, -74.006),
    ("201.17.45.90", "Sao Paulo, Brazil", -23.5505, -46.6333),
    ("41.203.64.7", "Lagos, Nigeria", 6.5244, 3.3792),
];

/// Private addresses that do not geolocate
const LOCAL_HOSTS: [&str; 2] = ["192.168.1.15", "10.0.0.5"];

/// Severity of a detection message
pub fn categorize(alert: &str) -> Severity {
    if alert.contains("SYN Flood") || alert.contains("Brute Force") {
        Severity::High
    } else if alert.contains("ARP Spoofing") {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[derive(Debug, Clone, PartialEq)]
struct GeoInfo {
    location: String,
    latitude: f64,
    longitude: f64,
}

impl GeoInfo {
    fn unknown() -> Self {
        Self {
            location: "Unknown, Unknown".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Detection {
    alert: String,
    ip: String,
    severity: Severity,
    geo: GeoInfo,
    at: NaiveDateTime,
}

struct DemoState {
    detections: Vec<Detection>,
    logged: AHashSet<String>,
    geo_cache: AHashMap<String, GeoInfo>,
    rng: StdRng,
}

impl DemoState {
    fn geolocate(&mut self, ip: &str) -> GeoInfo {
        if let Some(info) = self.geo_cache.get(ip) {
            return info.clone();
        }
        let info = KNOWN_HOSTS
            .iter()
            .find(|(host, ..)| *host == ip)
            .map(|(_, location, latitude, longitude)| GeoInfo {
                location: location.to_string(),
                latitude: *latitude,
                longitude: *longitude,
            })
            .unwrap_or_else(GeoInfo::unknown);
        self.geo_cache.insert(ip.to_string(), info.clone());
        info
    }

    fn record(&mut self, alert: &str, ip: &str, at: NaiveDateTime) -> bool {
        if !self.logged.insert(format!("{} from {}", alert, ip)) {
            return false;
        }
        let geo = self.geolocate(ip);
        let severity = categorize(alert);
        tracing::info!("{} from {} | Severity: {} | Location: {}", alert, ip, severity, geo.location);
        self.detections.push(Detection {
            alert: alert.to_string(),
            ip: ip.to_string(),
            severity,
            geo,
            at,
        });
        true
    }

    fn simulate(&mut self, at: NaiveDateTime) {
        if !self.rng.gen_bool(0.6) {
            return;
        }
        let hosts: Vec<&str> = KNOWN_HOSTS
            .iter()
            .map(|(host, ..)| *host)
            .chain(LOCAL_HOSTS)
            .collect();

        for _ in 0..self.rng.gen_range(1..=2) {
            let alert = DETECTIONS.choose(&mut self.rng).copied();
            let ip = hosts.choose(&mut self.rng).copied();
            if let (Some(alert), Some(ip)) = (alert, ip) {
                self.record(alert, ip, at);
            }
        }
    }
}

/// In-process stand-in for the dashboard backend
pub struct DemoSource {
    state: Mutex<DemoState>,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new(0x1d5)
    }
}

impl DemoSource {
    pub fn new(seed: u64) -> Self {
        Self {
            state: Mutex::new(DemoState {
                detections: Vec::new(),
                logged: AHashSet::new(),
                geo_cache: AHashMap::new(),
                rng: StdRng::seed_from_u64(seed),
            }),
        }
    }

    /// Log a detection unless the same alert from the same address was seen.
    /// Returns true if it was new.
    pub fn record(&self, alert: &str, ip: &str, at: NaiveDateTime) -> bool {
        self.state.lock().record(alert, ip, at)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state
            .lock()
            .detections
            .iter()
            .map(|d| Alert {
                message: d.alert.clone(),
                source_address: d.ip.clone(),
                severity: d.severity,
                location: d.geo.location.clone(),
            })
            .collect()
    }

    pub fn severity_counts(&self) -> SeveritySnapshot {
        let mut counts = SeveritySnapshot::default();
        for detection in &self.state.lock().detections {
            match detection.severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    /// Located detections; a zero latitude or longitude counts as unlocated
    pub fn geo_points(&self) -> Vec<GeoPoint> {
        self.state
            .lock()
            .detections
            .iter()
            .filter(|d| d.geo.latitude != 0.0 && d.geo.longitude != 0.0)
            .map(|d| GeoPoint {
                source_address: d.ip.clone(),
                latitude: d.geo.latitude,
                longitude: d.geo.longitude,
                alert_message: d.alert.clone(),
            })
            .collect()
    }

    /// Detections per minute, oldest bucket first
    pub fn alerts_over_time(&self) -> TimeSeriesSnapshot {
        let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
        for detection in &self.state.lock().detections {
            *buckets.entry(detection.at.format("%Y-%m-%d %H:%M").to_string()).or_default() += 1;
        }
        let (labels, counts) = buckets.into_iter().unzip();
        TimeSeriesSnapshot { labels, counts }
    }
}

#[async_trait]
impl DataSource for DemoSource {
    async fn fetch(&self, resource: Resource) -> Result<Snapshot, FetchError> {
        self.state.lock().simulate(Local::now().naive_local());

        Ok(match resource {
            Resource::Alerts => Snapshot::Alerts(self.alerts()),
            Resource::Severity => Snapshot::Severity(self.severity_counts()),
            Resource::TimeSeries => Snapshot::TimeSeries(self.alerts_over_time()),
            Resource::Geo => Snapshot::Geo(self.geo_points()),
        })
    }

    fn source_name(&self) -> &str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .unwrap()
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("SYN Flood detected"), Severity::High);
        assert_eq!(categorize("Brute Force attempt detected"), Severity::High);
        assert_eq!(categorize("ARP Spoofing detected"), Severity::Medium);
        assert_eq!(categorize("ICMP Ping detected"), Severity::Low);
        assert_eq!(categorize("Port scan detected"), Severity::Low);
    }

    #[test]
    fn test_duplicate_detection_is_skipped() {
        let source = DemoSource::new(1);
        assert!(source.record("SYN Flood detected", "185.220.101.4", at(10, 0, 0)));
        assert!(!source.record("SYN Flood detected", "185.220.101.4", at(10, 5, 0)));
        assert!(source.record("ICMP Ping detected", "185.220.101.4", at(10, 5, 0)));

        let alerts = source.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].location, "Berlin, Germany");
    }

    #[test]
    fn test_unlocated_addresses_stay_off_the_map() {
        let source = DemoSource::new(1);
        source.record("ARP Spoofing detected", "192.168.1.15", at(10, 0, 0));
        source.record("ARP Spoofing detected", "41.203.64.7", at(10, 0, 0));

        assert_eq!(source.alerts()[0].location, "Unknown, Unknown");
        let points = source.geo_points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].source_address, "41.203.64.7");
    }

    #[test]
    fn test_severity_counts() {
        let source = DemoSource::new(1);
        source.record("SYN Flood detected", "10.0.0.5", at(10, 0, 0));
        source.record("Brute Force attempt detected", "10.0.0.5", at(10, 0, 0));
        source.record("ARP Spoofing detected", "10.0.0.5", at(10, 0, 0));

        assert_eq!(source.severity_counts(), SeveritySnapshot { high: 2, medium: 1, low: 0 });
    }

    #[test]
    fn test_alerts_over_time_buckets_by_minute() {
        let source = DemoSource::new(1);
        source.record("ICMP Ping detected", "10.0.0.5", at(10, 1, 30));
        source.record("SYN Flood detected", "10.0.0.5", at(10, 0, 10));
        source.record("ARP Spoofing detected", "10.0.0.5", at(10, 1, 59));

        let series = source.alerts_over_time();
        assert_eq!(series.labels, vec!["2024-05-01 10:00", "2024-05-01 10:01"]);
        assert_eq!(series.counts, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_serves_every_resource() {
        let source = DemoSource::new(7);
        for resource in Resource::ALL {
            let snapshot = source.fetch(resource).await.unwrap();
            assert_eq!(snapshot.resource(), resource);
        }

        // Detections saturate at one per alert and address
        for _ in 0..200 {
            source.fetch(Resource::Alerts).await.unwrap();
        }
        let limit = DETECTIONS.len() * (KNOWN_HOSTS.len() + LOCAL_HOSTS.len());
        assert!(source.alerts().len() <= limit);
        let series = source.alerts_over_time();
        assert_eq!(series.labels.len(), series.counts.len());
    }
}
