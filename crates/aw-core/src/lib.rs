//! Core functionality for the alert dashboard
//!
//! This crate provides the resource model, the data source abstraction
//! and the pagination state shared by the views.

pub mod data;
pub mod model;
pub mod pagination;

// Re-export commonly used types
pub use data::{DataSource, FailureKind, FetchError};
pub use model::{
    Alert, GeoPoint, Resource, Severity, SeveritySnapshot, Snapshot, TimeSeriesSnapshot,
};
pub use pagination::{PaginationControls, PaginationState, DEFAULT_PAGE_SIZE};
