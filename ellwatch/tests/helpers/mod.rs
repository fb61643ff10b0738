#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ellwatch::{
    AlignedSeries, ChartRenderer, DashboardSummary, EllError, FixedClock, HistoryFetcher,
    Measurement, SummaryPresenter, TaskType,
};
use tokio::time::Instant;

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> DateTime<Utc> {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(hh, mm, ss))
        .expect("valid date")
        .and_utc()
}

/// 2024-01-01 10:05 in Seoul.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(dt(2024, 1, 1, 1, 5, 0)))
}

pub fn m(ts: &str, count: f64) -> Measurement {
    Measurement::new(ts, count)
}

/// Renderer and presenter that keeps everything it is handed.
#[derive(Default)]
pub struct Recorder {
    pub series: Mutex<Vec<AlignedSeries>>,
    pub summaries: Mutex<Vec<DashboardSummary>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rendered(&self) -> usize {
        self.series.lock().unwrap().len()
    }

    pub fn presented(&self) -> usize {
        self.summaries.lock().unwrap().len()
    }

    pub fn last_series(&self) -> AlignedSeries {
        self.series.lock().unwrap().last().cloned().expect("rendered")
    }
}

impl ChartRenderer for Recorder {
    fn render(&self, series: &AlignedSeries) -> Result<(), EllError> {
        self.series.lock().unwrap().push(series.clone());
        Ok(())
    }
}

impl SummaryPresenter for Recorder {
    fn present(&self, summary: &DashboardSummary) -> Result<(), EllError> {
        self.summaries.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

/// Renderer whose sink is always broken.
pub struct BrokenRenderer;

impl ChartRenderer for BrokenRenderer {
    fn render(&self, _series: &AlignedSeries) -> Result<(), EllError> {
        Err(EllError::Render("pipe closed".into()))
    }
}

/// Fetcher that sleeps before answering and tracks overlapping calls.
pub struct SlowFetcher {
    pub delay: Duration,
    pub started: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl SlowFetcher {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            started: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl HistoryFetcher for SlowFetcher {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn history(
        &self,
        task: TaskType,
        _not_older_than: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, EllError> {
        // Only the account fetch marks the cycle start and overlap.
        if task == TaskType::Account {
            self.started.lock().unwrap().push(Instant::now());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        }
        tokio::time::sleep(self.delay).await;
        if task == TaskType::Account {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(vec![Measurement::new("2024-01-01T10:00:00", 1.0)])
    }
}
