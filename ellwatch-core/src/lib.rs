//! ellwatch-core
//!
//! Core types, traits, and utilities shared across the ellwatch crates.
//!
//! - `types`: measurements as returned by the statistics endpoint and the
//!   per-cycle `Streams` bundle.
//! - `connector`: the `HistoryFetcher` trait plus the rendering and clock
//!   collaborators a dashboard drives.
//! - `timeseries`: bucketing, reconciliation onto one aligned axis, and the
//!   summary projections computed from it.
//!
//! Async runtime (Tokio)
//! ---------------------
//! `stream::PollHandle` wraps `tokio::task::JoinHandle<()>` and uses
//! `tokio::sync::oneshot::Sender<()>` for cooperative shutdown, so code that
//! spawns a polling loop must run under a Tokio 1.x runtime. The
//! reconciliation functions themselves are synchronous and runtime-agnostic.
#![warn(missing_docs)]

/// Collaborator traits: history fetchers, renderers, presenters, and clocks.
pub mod connector;
/// Handle utilities for background polling tasks.
pub mod stream;
/// Time-series utilities for bucketing, reconciliation, and summaries.
pub mod timeseries;
pub mod types;

pub use connector::{
    ChartRenderer, Clock, FixedClock, HistoryFetcher, SummaryPresenter, SystemClock,
};
pub use stream::PollHandle;
pub use timeseries::bucket::{Stamp, parse_stamp};
pub use timeseries::reconcile::{AlignedSeries, Bucket, ReconcileOptions, reconcile};
pub use timeseries::summary::{
    CategorySummary, DashboardSummary, LatestPoint, ProcessingTime, average_processing_time,
    latest, summarize,
};
pub use types::*;
