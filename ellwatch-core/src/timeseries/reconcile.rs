use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use super::bucket::{format_key, parse_stamp, truncate};
use crate::{DashboardConfig, Granularity, MatchPolicy, Streams, TaskType};

/// Parameters of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Bucket width, matching tolerance, and label format.
    pub granularity: Granularity,
    /// Tie-break when several measurements fall within tolerance of a bucket.
    pub match_policy: MatchPolicy,
    /// Zone in which naive timestamps are interpreted.
    pub source_tz: Tz,
    /// Zone in which labels are rendered.
    pub display_tz: Tz,
}

impl ReconcileOptions {
    /// Options with the given granularity and UTC on both ends.
    #[must_use]
    pub const fn utc(granularity: Granularity) -> Self {
        Self {
            granularity,
            match_policy: MatchPolicy::First,
            source_tz: chrono_tz::UTC,
            display_tz: chrono_tz::UTC,
        }
    }
}

impl From<&DashboardConfig> for ReconcileOptions {
    fn from(cfg: &DashboardConfig) -> Self {
        Self {
            granularity: cfg.granularity,
            match_policy: cfg.match_policy,
            source_tz: cfg.source_tz,
            display_tz: cfg.display_tz,
        }
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

/// One slot on the aligned axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Wall-clock bucket start in the source zone.
    pub key: NaiveDateTime,
    /// Absolute target instant measurements are matched against.
    pub at: DateTime<Utc>,
    /// Display label rendered in the display zone.
    pub label: String,
}

/// Chart-ready output of [`reconcile`].
///
/// `values[t.index()]` has exactly one entry per `axis` bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedSeries {
    /// Ascending, de-duplicated buckets.
    pub axis: Vec<Bucket>,
    /// Rounded counts per category, positionally aligned with `axis`.
    pub values: [Vec<u64>; 3],
    /// Measurements dropped because their timestamp could not be parsed.
    pub parse_failures: usize,
    /// Granularity the axis was built with.
    pub granularity: Granularity,
}

impl AlignedSeries {
    /// Number of buckets on the axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    /// True when no bucket was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Aligned values for one category.
    #[must_use]
    pub fn values(&self, task: TaskType) -> &[u64] {
        &self.values[task.index()]
    }

    /// Display labels in axis order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.axis.iter().map(|b| b.label.as_str())
    }

    /// Fixed-width bucket keys in axis order.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.axis
            .iter()
            .map(|b| format_key(b.key, self.granularity))
    }
}

struct Parsed {
    at: DateTime<Utc>,
    count: f64,
}

/// Align the three category streams onto one ascending bucket axis.
///
/// - Each parsable measurement contributes its truncated wall-clock time as a
///   bucket key; the axis is the sorted set of distinct keys. A bucket's target
///   instant is taken from the first measurement that produced its key, so a
///   repeated wall-clock hour (DST fall-back) still matches its own samples.
/// - For every bucket and category, a measurement matches when its instant is
///   strictly closer than one bucket width to the bucket's target instant.
///   [`MatchPolicy::First`] takes the first match in stream order,
///   [`MatchPolicy::Closest`] the nearest one.
/// - Matched counts are rounded to the nearest integer; unmatched buckets are `0`.
/// - Unparsable timestamps are skipped and counted in `parse_failures`.
///
/// The result depends only on the inputs: nothing carries over between calls.
#[must_use]
pub fn reconcile(streams: &Streams, opts: &ReconcileOptions) -> AlignedSeries {
    let mut parse_failures = 0usize;
    let mut keys: BTreeMap<NaiveDateTime, DateTime<Utc>> = BTreeMap::new();
    let mut parsed: [Vec<Parsed>; 3] = Default::default();

    for (task, stream) in streams.iter() {
        let out = &mut parsed[task.index()];
        out.reserve(stream.len());
        for m in stream {
            match parse_stamp(&m.finished_at, opts.source_tz) {
                Some(stamp) => {
                    let key = truncate(stamp.wall, opts.granularity);
                    keys.entry(key).or_insert(stamp.at - (stamp.wall - key));
                    out.push(Parsed {
                        at: stamp.at,
                        count: m.distinct_count,
                    });
                }
                None => parse_failures += 1,
            }
        }
    }

    let label_format = opts.granularity.label_format();
    let axis: Vec<Bucket> = keys
        .into_iter()
        .map(|(key, at)| Bucket {
            key,
            at,
            label: at
                .with_timezone(&opts.display_tz)
                .format(label_format)
                .to_string(),
        })
        .collect();

    let tolerance_ms = opts.granularity.tolerance_ms();
    let values: [Vec<u64>; 3] = TaskType::ALL.map(|task| {
        let stream = &parsed[task.index()];
        axis.iter()
            .map(|b| {
                select(stream, b.at, tolerance_ms, opts.match_policy)
                    .map_or(0, |p| round_count(p.count))
            })
            .collect()
    });

    AlignedSeries {
        axis,
        values,
        parse_failures,
        granularity: opts.granularity,
    }
}

fn select(
    stream: &[Parsed],
    target: DateTime<Utc>,
    tolerance_ms: i64,
    policy: MatchPolicy,
) -> Option<&Parsed> {
    let distance = |p: &Parsed| (p.at - target).num_milliseconds().abs();
    let mut within = stream.iter().filter(|p| distance(*p) < tolerance_ms);
    match policy {
        MatchPolicy::First => within.next(),
        // min_by_key keeps the first of equally distant candidates
        MatchPolicy::Closest => within.min_by_key(|p| distance(*p)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_count(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.round() as u64
    } else {
        0
    }
}
