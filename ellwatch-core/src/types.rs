//! Measurement records and per-cycle stream bundles, plus re-exports of the
//! shared `ellwatch-types` primitives.
// Consolidated re-exports so downstream crates can depend on `ellwatch-core` only

use core::ops::Index;

use serde::{Deserialize, Serialize};

pub use ellwatch_types::{
    DEFAULT_BASE_URL, DEFAULT_RETENTION_POINTS, DashboardConfig, EllError, Granularity,
    MatchPolicy, TaskType,
};

/// One finished estimation task as reported by the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Completion timestamp exactly as received (usually a naive
    /// `YYYY-MM-DDTHH:mm:ss[.fff]` wall-clock value).
    pub finished_at: String,
    /// Approximate number of distinct items seen in the task's window.
    pub distinct_count: f64,
    /// Time the server spent producing the estimate; `None` when not measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

impl Measurement {
    /// Build a measurement without processing time.
    pub fn new(finished_at: impl Into<String>, distinct_count: f64) -> Self {
        Self {
            finished_at: finished_at.into(),
            distinct_count,
            processing_time_ms: None,
        }
    }

    /// Attach a processing time in milliseconds.
    #[must_use]
    pub const fn with_processing_time(mut self, ms: f64) -> Self {
        self.processing_time_ms = Some(ms);
        self
    }
}

/// The three raw streams fetched during one poll cycle, indexed by [`TaskType`].
///
/// Each stream keeps the order in which the endpoint returned it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Streams {
    streams: [Vec<Measurement>; 3],
}

impl Streams {
    /// Bundle the account, IP, and e-mail domain streams.
    #[must_use]
    pub const fn new(
        account: Vec<Measurement>,
        ip: Vec<Measurement>,
        domain: Vec<Measurement>,
    ) -> Self {
        Self {
            streams: [account, ip, domain],
        }
    }

    /// Borrow the stream for a category.
    #[must_use]
    pub fn get(&self, task: TaskType) -> &[Measurement] {
        &self.streams[task.index()]
    }

    /// Replace the stream for a category.
    pub fn set(&mut self, task: TaskType, stream: Vec<Measurement>) {
        self.streams[task.index()] = stream;
    }

    /// Iterate `(category, stream)` pairs in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskType, &[Measurement])> {
        TaskType::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    /// Total number of measurements across all categories.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.streams.iter().map(Vec::len).sum()
    }

    /// True when no category returned any measurement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.iter().all(Vec::is_empty)
    }
}

impl Index<TaskType> for Streams {
    type Output = [Measurement];

    fn index(&self, task: TaskType) -> &Self::Output {
        self.get(task)
    }
}

impl FromIterator<(TaskType, Vec<Measurement>)> for Streams {
    fn from_iter<I: IntoIterator<Item = (TaskType, Vec<Measurement>)>>(iter: I) -> Self {
        let mut out = Self::default();
        for (task, stream) in iter {
            out.set(task, stream);
        }
        out
    }
}
