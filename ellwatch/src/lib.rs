//! ellwatch polls a distinct-count statistics endpoint and turns three
//! independently sampled task streams into one chart-ready time axis.
//!
//! Overview
//! - A single [`HistoryFetcher`] supplies the account, IP, and e-mail domain
//!   streams; the three fetches of a cycle run concurrently.
//! - Every fetch is bounded by `fetch_timeout`. A failed or timed-out fetch is
//!   logged and replaced by an empty stream, so a cycle never aborts.
//! - The streams are reconciled onto one ascending bucket axis (see
//!   [`ellwatch_core::reconcile`]) and handed to the registered
//!   [`ChartRenderer`]s, then summarized for the [`SummaryPresenter`]s.
//!
//! Key behaviors and trade-offs
//! - Polling: the first cycle starts immediately, later ones every
//!   `poll_interval`. Cycles never overlap; ticks missed during a slow cycle
//!   are skipped, which keeps output in cycle-start order at the cost of an
//!   occasional longer gap.
//! - Matching: `MatchPolicy::First` reproduces stream-order selection within
//!   one bucket width; `Closest` picks the nearest sample instead.
//! - Time zones: naive timestamps and the request window use one configured
//!   source zone; labels may be rendered in a different display zone.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use ellwatch::{Dashboard, DashboardConfig, TextChartRenderer, TextSummaryPresenter};
//! use ellwatch_http::HttpHistoryFetcher;
//!
//! let dashboard = Arc::new(
//!     Dashboard::builder()
//!         .with_fetcher(Arc::new(HttpHistoryFetcher::new_default()?))
//!         .with_renderer(Arc::new(TextChartRenderer::stdout()))
//!         .with_presenter(Arc::new(TextSummaryPresenter::stdout()))
//!         .config(DashboardConfig::minutely())
//!         .build()?,
//! );
//!
//! let handle = dashboard.spawn();
//! // ... later ...
//! handle.stop().await;
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod poll;
pub mod render;

pub use self::core::{CycleReport, Dashboard, DashboardBuilder};
pub use render::{JsonRenderer, TextChartRenderer, TextSummaryPresenter};

// Re-export core types for convenience
pub use ellwatch_core::{
    AlignedSeries,
    Bucket,
    CategorySummary,
    // Collaborators
    ChartRenderer,
    Clock,
    // Configuration
    DashboardConfig,
    DashboardSummary,
    EllError,
    FixedClock,
    Granularity,
    HistoryFetcher,
    LatestPoint,
    MatchPolicy,
    // Data
    Measurement,
    PollHandle,
    ProcessingTime,
    ReconcileOptions,
    Streams,
    SummaryPresenter,
    SystemClock,
    TaskType,
};
