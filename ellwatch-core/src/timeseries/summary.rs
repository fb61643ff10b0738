use core::fmt;

use super::reconcile::AlignedSeries;
use crate::{Measurement, Streams, TaskType};

/// Most recent aligned value of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatestPoint {
    /// The axis is empty.
    NoData,
    /// Value and label at the highest-index bucket.
    Value {
        /// Rounded count (may be `0` when the category had no match there).
        count: u64,
        /// Display label of the bucket.
        label: String,
    },
}

impl LatestPoint {
    /// Count, if any.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        match self {
            Self::NoData => None,
            Self::Value { count, .. } => Some(*count),
        }
    }

    /// Label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::NoData => None,
            Self::Value { label, .. } => Some(label),
        }
    }
}

/// Average server processing time over a raw stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingTime {
    /// The stream was empty.
    NoData,
    /// The stream had entries, none of which reported a processing time.
    Zero,
    /// Arithmetic mean of the reported processing times, in milliseconds.
    Mean(f64),
}

impl fmt::Display for ProcessingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str("(Avg Time: - ms)"),
            Self::Zero => f.write_str("(Avg Time: 0 ms)"),
            Self::Mean(ms) => write!(f, "(Avg Time: {ms:.1} ms)"),
        }
    }
}

/// Summary row for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// Category the row describes.
    pub task: TaskType,
    /// Latest aligned value.
    pub latest: LatestPoint,
    /// Average processing time over the raw stream.
    pub processing_time: ProcessingTime,
}

/// Summary rows for all three categories, in chart order.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// One row per category, indexed by [`TaskType::index`].
    pub rows: [CategorySummary; 3],
}

impl DashboardSummary {
    /// Row for a category.
    #[must_use]
    pub fn get(&self, task: TaskType) -> &CategorySummary {
        &self.rows[task.index()]
    }
}

/// Project the most recent bucket of every category.
#[must_use]
pub fn latest(series: &AlignedSeries) -> [LatestPoint; 3] {
    TaskType::ALL.map(|task| match series.axis.last() {
        None => LatestPoint::NoData,
        Some(bucket) => LatestPoint::Value {
            count: series.values(task).last().copied().unwrap_or(0),
            label: bucket.label.clone(),
        },
    })
}

/// Mean of the processing times present in `stream`; entries without one are
/// excluded from both the sum and the count.
#[must_use]
pub fn average_processing_time(stream: &[Measurement]) -> ProcessingTime {
    if stream.is_empty() {
        return ProcessingTime::NoData;
    }
    let (sum, n) = stream
        .iter()
        .filter_map(|m| m.processing_time_ms)
        .fold((0.0_f64, 0_u32), |(sum, n), ms| (sum + ms, n + 1));
    if n == 0 {
        ProcessingTime::Zero
    } else {
        ProcessingTime::Mean(sum / f64::from(n))
    }
}

/// Build the per-category summary from the raw streams and their aligned series.
#[must_use]
pub fn summarize(streams: &Streams, series: &AlignedSeries) -> DashboardSummary {
    let mut points = latest(series).into_iter();
    let rows = TaskType::ALL.map(|task| CategorySummary {
        task,
        latest: points.next().unwrap_or(LatestPoint::NoData),
        processing_time: average_processing_time(streams.get(task)),
    });
    DashboardSummary { rows }
}
