//! Last-known snapshot per resource

use std::sync::Arc;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use aw_core::{Resource, Snapshot};

/// A snapshot together with the time it arrived
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Snapshot,
    pub received_at: DateTime<Utc>,
}

/// Snapshot cache shared between the poll tasks and the UI.
///
/// Holds exactly one entry per resource; a newer arrival always replaces the
/// older one, whatever order the fetches were issued in.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    entries: Arc<RwLock<AHashMap<Resource, CachedSnapshot>>>,
}

impl SnapshotCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last snapshot of a resource
    pub fn get(&self, resource: Resource) -> Option<CachedSnapshot> {
        self.entries.read().get(&resource).cloned()
    }

    /// Store a snapshot, replacing the previous one of the same resource
    pub fn put(&self, snapshot: Snapshot) {
        let resource = snapshot.resource();
        self.entries.write().insert(
            resource,
            CachedSnapshot {
                snapshot,
                received_at: Utc::now(),
            },
        );
    }

    pub fn last_updated(&self, resource: Resource) -> Option<DateTime<Utc>> {
        self.entries.read().get(&resource).map(|entry| entry.received_at)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::SeveritySnapshot;

    #[test]
    fn test_last_arrival_wins() {
        let cache = SnapshotCache::new();
        assert!(cache.get(Resource::Severity).is_none());

        cache.put(Snapshot::Severity(SeveritySnapshot { high: 3, medium: 1, low: 0 }));
        cache.put(Snapshot::Severity(SeveritySnapshot { high: 5, medium: 1, low: 2 }));

        let entry = cache.get(Resource::Severity).unwrap();
        assert_eq!(
            entry.snapshot,
            Snapshot::Severity(SeveritySnapshot { high: 5, medium: 1, low: 2 })
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_resources_are_independent() {
        let cache = SnapshotCache::new();
        let shared = cache.clone();

        shared.put(Snapshot::Alerts(Vec::new()));
        shared.put(Snapshot::Geo(Vec::new()));

        assert!(cache.last_updated(Resource::Alerts).is_some());
        assert!(cache.last_updated(Resource::Geo).is_some());
        assert!(cache.last_updated(Resource::TimeSeries).is_none());

        cache.clear();
        assert!(shared.is_empty());
    }
}
