//! Configuration types shared by the dashboard, its connectors, and front-ends.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::EllError;

/// Default statistics endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/statistics";

/// Number of buckets requested per cycle when no retention is configured.
pub const DEFAULT_RETENTION_POINTS: u32 = 11;

/// Width of a time bucket on the aligned axis.
///
/// The granularity also fixes the matching tolerance (one bucket width) and the
/// display format of axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One-minute buckets, labelled `HH:MM`.
    #[default]
    Minute,
    /// One-second buckets, labelled `HH:MM:SS`.
    Second,
}

impl Granularity {
    /// Bucket width in whole seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::Minute => 60,
            Self::Second => 1,
        }
    }

    /// Bucket width as a `Duration`.
    #[must_use]
    pub const fn width(self) -> Duration {
        Duration::from_secs(self.seconds().unsigned_abs())
    }

    /// A measurement matches a bucket when it lies strictly closer than this
    /// many milliseconds to the bucket's target instant.
    #[must_use]
    pub const fn tolerance_ms(self) -> i64 {
        self.seconds() * 1000
    }

    /// `strftime` pattern for axis labels.
    #[must_use]
    pub const fn label_format(self) -> &'static str {
        match self {
            Self::Minute => "%H:%M",
            Self::Second => "%H:%M:%S",
        }
    }

    /// `strftime` pattern for the fixed-width bucket key.
    #[must_use]
    pub const fn key_format(self) -> &'static str {
        match self {
            Self::Minute => "%Y-%m-%dT%H:%M",
            Self::Second => "%Y-%m-%dT%H:%M:%S",
        }
    }
}

impl core::str::FromStr for Granularity {
    type Err = EllError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minute" | "min" | "m" => Ok(Self::Minute),
            "second" | "sec" | "s" => Ok(Self::Second),
            other => Err(EllError::InvalidArg(format!("unknown granularity: {other}"))),
        }
    }
}

/// Which measurement wins when several fall within tolerance of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The first measurement in the stream's original order wins.
    #[default]
    First,
    /// The measurement nearest the bucket's target instant wins; ties go to
    /// the earlier one in stream order.
    Closest,
}

impl core::str::FromStr for MatchPolicy {
    type Err = EllError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "closest" | "nearest" => Ok(Self::Closest),
            other => Err(EllError::InvalidArg(format!("unknown match policy: {other}"))),
        }
    }
}

/// Serde adapter storing a `Duration` as integer milliseconds.
pub mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a duration as whole milliseconds.
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// Deserialize a duration from whole milliseconds.
    ///
    /// # Errors
    /// Propagates deserializer errors.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Global configuration for a polling dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Statistics endpoint queried by the HTTP fetcher.
    pub base_url: String,
    /// Bucket width for the aligned axis.
    pub granularity: Granularity,
    /// Delay between the starts of consecutive poll cycles.
    #[serde(with = "duration_ms", rename = "poll_interval_ms")]
    pub poll_interval: Duration,
    /// Upper bound for a single history fetch.
    #[serde(with = "duration_ms", rename = "fetch_timeout_ms")]
    pub fetch_timeout: Duration,
    /// How many buckets back each cycle requests (`not_older_than = now - n * width`).
    pub retention_points: u32,
    /// Tie-break policy when several measurements match one bucket.
    pub match_policy: MatchPolicy,
    /// Civil zone in which the server writes naive timestamps and expects the
    /// `finishedAt` request parameter.
    pub source_tz: Tz,
    /// Zone used to render axis labels.
    pub display_tz: Tz,
}

impl DashboardConfig {
    /// One-minute buckets polled every 60 seconds.
    #[must_use]
    pub fn minutely() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            granularity: Granularity::Minute,
            poll_interval: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(5),
            retention_points: DEFAULT_RETENTION_POINTS,
            match_policy: MatchPolicy::First,
            source_tz: chrono_tz::Asia::Seoul,
            display_tz: chrono_tz::Asia::Seoul,
        }
    }

    /// One-second buckets polled every 5 seconds.
    #[must_use]
    pub fn secondly() -> Self {
        Self {
            granularity: Granularity::Second,
            poll_interval: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(2),
            ..Self::minutely()
        }
    }

    /// Span of history requested per cycle.
    #[must_use]
    pub fn retention(&self) -> Duration {
        self.granularity.width() * self.retention_points
    }

    /// Check the configuration for values that would stall or break polling.
    ///
    /// # Errors
    /// Returns `EllError::Config` for an empty base URL, a zero poll interval,
    /// a zero fetch timeout, or zero retention points.
    pub fn validate(&self) -> Result<(), EllError> {
        if self.base_url.trim().is_empty() {
            return Err(EllError::Config("base_url must not be empty".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(EllError::Config("poll_interval must be positive".into()));
        }
        if self.fetch_timeout.is_zero() {
            return Err(EllError::Config("fetch_timeout must be positive".into()));
        }
        if self.retention_points == 0 {
            return Err(EllError::Config("retention_points must be positive".into()));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::minutely()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_in_cadence() {
        let m = DashboardConfig::minutely();
        let s = DashboardConfig::secondly();
        assert_eq!(m.poll_interval, Duration::from_secs(60));
        assert_eq!(s.poll_interval, Duration::from_secs(5));
        assert_eq!(s.granularity, Granularity::Second);
        assert_eq!(m.base_url, s.base_url);
        assert_eq!(m.source_tz, s.source_tz);
    }

    #[test]
    fn retention_scales_with_granularity() {
        assert_eq!(DashboardConfig::minutely().retention(), Duration::from_secs(660));
        assert_eq!(DashboardConfig::secondly().retention(), Duration::from_secs(11));
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let cfg = DashboardConfig {
            poll_interval: Duration::ZERO,
            ..DashboardConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(EllError::Config(_))));
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn granularity_parses_short_forms() {
        assert_eq!("min".parse::<Granularity>().unwrap(), Granularity::Minute);
        assert_eq!("SECOND".parse::<Granularity>().unwrap(), Granularity::Second);
        assert!("hour".parse::<Granularity>().is_err());
    }

    #[test]
    fn match_policy_parses() {
        assert_eq!("Closest".parse::<MatchPolicy>().unwrap(), MatchPolicy::Closest);
        assert_eq!("first".parse::<MatchPolicy>().unwrap(), MatchPolicy::First);
        assert!(matches!("latest".parse::<MatchPolicy>(), Err(EllError::InvalidArg(_))));
    }
}
