//! Time-series utilities used by the dashboard on every poll cycle.
//!
//! Modules include:
//! - `bucket`: parse raw timestamps and truncate them to bucket keys
//! - `reconcile`: align three independently timestamped streams on one axis
//! - `summary`: latest-point and processing-time projections
/// Timestamp parsing and bucket-key helpers.
pub mod bucket;
/// Alignment of the three category streams onto one bucket axis.
pub mod reconcile;
/// Summary projections over raw streams and aligned series.
pub mod summary;
