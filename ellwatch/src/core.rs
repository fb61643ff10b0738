use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use ellwatch_core::{
    AlignedSeries, ChartRenderer, Clock, DashboardConfig, DashboardSummary, EllError,
    Granularity, HistoryFetcher, MatchPolicy, Measurement, ReconcileOptions, Streams,
    SummaryPresenter, SystemClock, TaskType, reconcile, summarize,
};

/// Orchestrator that polls one history fetcher and feeds renderers.
pub struct Dashboard {
    pub(crate) fetcher: Arc<dyn HistoryFetcher>,
    pub(crate) renderers: Vec<Arc<dyn ChartRenderer>>,
    pub(crate) presenters: Vec<Arc<dyn SummaryPresenter>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) cfg: DashboardConfig,
    pub(crate) cycles: AtomicU64,
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// 1-based sequence number of the cycle within this dashboard.
    pub cycle: u64,
    /// Lower bound sent to the fetcher.
    pub not_older_than: DateTime<Utc>,
    /// Aligned chart data.
    pub series: AlignedSeries,
    /// Summary rows derived from the raw streams and the series.
    pub summary: DashboardSummary,
}

/// Builder for constructing a `Dashboard` with custom configuration.
pub struct DashboardBuilder {
    fetcher: Option<Arc<dyn HistoryFetcher>>,
    renderers: Vec<Arc<dyn ChartRenderer>>,
    presenters: Vec<Arc<dyn SummaryPresenter>>,
    clock: Option<Arc<dyn Clock>>,
    cfg: DashboardConfig,
}

impl Default for DashboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardBuilder {
    /// Create a new builder with the minutely preset and no collaborators.
    ///
    /// A fetcher is required; renderers and presenters are optional and may be
    /// registered more than once. The system clock is used unless
    /// [`with_clock`](Self::with_clock) overrides it.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fetcher: None,
            renderers: vec![],
            presenters: vec![],
            clock: None,
            cfg: DashboardConfig::default(),
        }
    }

    /// Set the history fetcher. A later call replaces an earlier one.
    #[must_use]
    pub fn with_fetcher(mut self, f: Arc<dyn HistoryFetcher>) -> Self {
        self.fetcher = Some(f);
        self
    }

    /// Register a chart renderer. Renderers run in registration order.
    #[must_use]
    pub fn with_renderer(mut self, r: Arc<dyn ChartRenderer>) -> Self {
        self.renderers.push(r);
        self
    }

    /// Register a summary presenter. Presenters run after all renderers.
    #[must_use]
    pub fn with_presenter(mut self, p: Arc<dyn SummaryPresenter>) -> Self {
        self.presenters.push(p);
        self
    }

    /// Replace the wall clock used to compute the request window.
    #[must_use]
    pub fn with_clock(mut self, c: Arc<dyn Clock>) -> Self {
        self.clock = Some(c);
        self
    }

    /// Replace the whole configuration.
    ///
    /// Individual setters called afterwards still apply on top of it.
    #[must_use]
    pub fn config(mut self, cfg: DashboardConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Select the bucket width.
    ///
    /// This does not change the poll interval; use
    /// [`DashboardConfig::secondly`] through [`config`](Self::config) for the
    /// matching cadence.
    #[must_use]
    pub const fn granularity(mut self, g: Granularity) -> Self {
        self.cfg.granularity = g;
        self
    }

    /// Set the delay between the starts of consecutive cycles.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.cfg.poll_interval = interval;
        self
    }

    /// Set the upper bound for one history fetch.
    #[must_use]
    pub const fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.fetch_timeout = timeout;
        self
    }

    /// Set how many buckets back each cycle requests.
    #[must_use]
    pub const fn retention_points(mut self, n: u32) -> Self {
        self.cfg.retention_points = n;
        self
    }

    /// Select the tie-break policy for buckets with several candidates.
    #[must_use]
    pub const fn match_policy(mut self, policy: MatchPolicy) -> Self {
        self.cfg.match_policy = policy;
        self
    }

    /// Set the zone the server writes naive timestamps in.
    #[must_use]
    pub const fn source_tz(mut self, tz: Tz) -> Self {
        self.cfg.source_tz = tz;
        self
    }

    /// Set the zone axis labels are rendered in.
    #[must_use]
    pub const fn display_tz(mut self, tz: Tz) -> Self {
        self.cfg.display_tz = tz;
        self
    }

    /// Build the `Dashboard`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no fetcher has been registered via
    /// [`with_fetcher`](Self::with_fetcher), and `Config` when the
    /// configuration fails [`DashboardConfig::validate`].
    pub fn build(self) -> Result<Dashboard, EllError> {
        let Some(fetcher) = self.fetcher else {
            return Err(EllError::InvalidArg(
                "no fetcher registered; add one via with_fetcher(...)".to_string(),
            ));
        };
        self.cfg.validate()?;

        Ok(Dashboard {
            fetcher,
            renderers: self.renderers,
            presenters: self.presenters,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            cfg: self.cfg,
            cycles: AtomicU64::new(0),
        })
    }
}

impl Dashboard {
    /// Start building a new `Dashboard`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use ellwatch::{Dashboard, DashboardConfig, TextChartRenderer, TextSummaryPresenter};
    /// use ellwatch_http::HttpHistoryFetcher;
    ///
    /// let dashboard = Dashboard::builder()
    ///     .with_fetcher(Arc::new(HttpHistoryFetcher::new_default()?))
    ///     .with_renderer(Arc::new(TextChartRenderer::stdout()))
    ///     .with_presenter(Arc::new(TextSummaryPresenter::stdout()))
    ///     .config(DashboardConfig::secondly())
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.cfg
    }

    /// Number of cycles started so far.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Lower bound of the request window: `now - retention_points × granularity`.
    #[must_use]
    pub fn not_older_than(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::from_std(self.cfg.retention())
            .ok()
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Wrap a fetcher future with a timeout and standardized timeout error mapping.
    #[tracing::instrument(
        name = "ellwatch::core::fetch_call_with_timeout",
        skip(fut),
        fields(
            fetcher = fetcher_name,
            task = %task,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
    )]
    pub(crate) async fn fetch_call_with_timeout<T, Fut>(
        fetcher_name: &'static str,
        task: TaskType,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, EllError>
    where
        Fut: core::future::Future<Output = Result<T, EllError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(EllError::fetch_timeout(fetcher_name, task)))
    }

    /// Fetch one category's history, degrading any failure to an empty stream.
    ///
    /// The fetch is bounded by `fetch_timeout`. Errors and timeouts are logged
    /// at `error` level and never propagate, so a cycle always completes.
    #[tracing::instrument(
        name = "ellwatch::core::fetch_history",
        skip(self),
        fields(fetcher = self.fetcher.name(), task = %task),
    )]
    pub async fn fetch_history(
        &self,
        task: TaskType,
        not_older_than: DateTime<Utc>,
    ) -> Vec<Measurement> {
        let name = self.fetcher.name();
        let fut = self.fetcher.history(task, not_older_than);
        match Self::fetch_call_with_timeout(name, task, self.cfg.fetch_timeout, fut).await {
            Ok(stream) => {
                tracing::debug!(count = stream.len(), "history fetched");
                stream
            }
            Err(e) => {
                tracing::error!(error = %e, "history fetch failed; using empty stream");
                Vec::new()
            }
        }
    }

    /// Fetch all three categories concurrently.
    ///
    /// The join always completes because each fetch resolves to a stream.
    pub async fn fetch_all(&self, not_older_than: DateTime<Utc>) -> Streams {
        let tasks = TaskType::ALL.map(|task| self.fetch_history(task, not_older_than));
        let results = futures::future::join_all(tasks).await;
        TaskType::ALL.into_iter().zip(results).collect()
    }

    /// Run one fetch, reconcile, and render pass.
    ///
    /// Renderer and presenter failures are logged at `warn` level; the report
    /// is returned regardless.
    #[tracing::instrument(
        name = "ellwatch::core::run_cycle",
        skip(self),
        fields(granularity = ?self.cfg.granularity),
    )]
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let not_older_than = self.not_older_than(self.clock.now());
        tracing::info!(cycle, %not_older_than, "cycle started");

        let streams = self.fetch_all(not_older_than).await;
        let series = reconcile(&streams, &ReconcileOptions::from(&self.cfg));
        if series.parse_failures > 0 {
            tracing::warn!(
                cycle,
                parse_failures = series.parse_failures,
                "skipped measurements with unparsable timestamps"
            );
        }
        let summary = summarize(&streams, &series);

        for r in &self.renderers {
            if let Err(e) = r.render(&series) {
                tracing::warn!(cycle, error = %e, "chart renderer failed");
            }
        }
        for p in &self.presenters {
            if let Err(e) = p.present(&summary) {
                tracing::warn!(cycle, error = %e, "summary presenter failed");
            }
        }

        tracing::info!(
            cycle,
            buckets = series.len(),
            measurements = streams.total_len(),
            "cycle finished"
        );
        CycleReport {
            cycle,
            not_older_than,
            series,
            summary,
        }
    }
}
