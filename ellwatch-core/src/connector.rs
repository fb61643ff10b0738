use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::timeseries::reconcile::AlignedSeries;
use crate::timeseries::summary::DashboardSummary;
use crate::{EllError, Measurement, TaskType};

/// Source of historical measurements for one task category.
///
/// Implementations report failures through `Err`; the dashboard is the layer
/// that turns them into empty streams so a cycle never aborts.
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// Short, stable name used in logs and error values.
    fn name(&self) -> &'static str;

    /// Fetch every measurement of `task` finished after `not_older_than`.
    ///
    /// The returned order is the endpoint's order and is not required to be
    /// chronological.
    async fn history(
        &self,
        task: TaskType,
        not_older_than: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, EllError>;
}

/// Receives the aligned series once per cycle and draws the three charts.
pub trait ChartRenderer: Send + Sync {
    /// Redraw from `series`, which fully replaces whatever was drawn before.
    ///
    /// # Errors
    /// Returns `EllError::Render` when the output sink fails.
    fn render(&self, series: &AlignedSeries) -> Result<(), EllError>;
}

/// Receives the per-category summary rows once per cycle.
pub trait SummaryPresenter: Send + Sync {
    /// Write the latest values, labels, and processing-time figures.
    ///
    /// # Errors
    /// Returns `EllError::Render` when the output sink fails.
    fn present(&self, summary: &DashboardSummary) -> Result<(), EllError>;
}

/// Wall-clock source used to compute the request window.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Start the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = now;
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: TimeDelta) {
        let mut guard = self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self
            .now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance(TimeDelta::seconds(90));
        assert_eq!(clock.now(), start + TimeDelta::seconds(90));
        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
