use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::Granularity;

// Tried in order; `%.f` also accepts a missing fractional part.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A parsed measurement timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    /// Wall-clock time in the source zone; bucket keys derive from this.
    pub wall: NaiveDateTime,
    /// Absolute instant used for tolerance matching.
    pub at: DateTime<Utc>,
}

/// Parse a raw `finishedAt` value.
///
/// Naive values are interpreted as wall-clock time in `source_tz`. Values that
/// carry an explicit offset (`Z`, `+09:00`, ...) keep their instant and are
/// converted into `source_tz` for bucketing.
///
/// Returns `None` for unparsable text and for naive times that do not exist in
/// `source_tz` (DST gaps). Ambiguous times resolve to the earlier instant.
#[must_use]
pub fn parse_stamp(raw: &str, source_tz: Tz) -> Option<Stamp> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let at = dt.with_timezone(&Utc);
        return Some(Stamp {
            wall: at.with_timezone(&source_tz).naive_local(),
            at,
        });
    }
    let wall = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;
    let at = instant_of(wall, source_tz)?;
    Some(Stamp { wall, at })
}

/// Truncate a wall-clock time to the start of its bucket.
#[must_use]
pub fn truncate(wall: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let t = wall.with_nanosecond(0).unwrap_or(wall);
    match granularity {
        Granularity::Minute => t.with_second(0).unwrap_or(t),
        Granularity::Second => t,
    }
}

/// Resolve a wall-clock time in `tz` to an absolute instant.
#[must_use]
pub fn instant_of(wall: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&wall)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Fixed-width rendering of a bucket key (`YYYY-MM-DDTHH:mm[:ss]`).
///
/// Lexicographic order of these strings equals chronological order of keys.
#[must_use]
pub fn format_key(key: NaiveDateTime, granularity: Granularity) -> String {
    key.format(granularity.key_format()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wall(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn parses_naive_with_and_without_fraction() {
        let a = parse_stamp("2024-01-01T10:00:05", chrono_tz::UTC).unwrap();
        let b = parse_stamp("2024-01-01T10:00:05.250", chrono_tz::UTC).unwrap();
        assert_eq!(a.wall, wall(10, 0, 5, 0));
        assert_eq!(b.wall, wall(10, 0, 5, 250));
        assert_eq!((b.at - a.at).num_milliseconds(), 250);
    }

    #[test]
    fn naive_values_use_source_zone() {
        let s = parse_stamp("2024-01-01T10:00:00", chrono_tz::Asia::Seoul).unwrap();
        assert_eq!(s.at.to_rfc3339(), "2024-01-01T01:00:00+00:00");
    }

    #[test]
    fn explicit_offset_is_converted_into_source_zone() {
        let s = parse_stamp("2024-01-01T01:00:30Z", chrono_tz::Asia::Seoul).unwrap();
        assert_eq!(s.wall, wall(10, 0, 30, 0));
    }

    #[test]
    fn garbage_and_dst_gap_are_rejected() {
        assert!(parse_stamp("yesterday", chrono_tz::UTC).is_none());
        assert!(parse_stamp("", chrono_tz::UTC).is_none());
        // 02:30 does not exist in Berlin on the spring-forward date.
        assert!(parse_stamp("2024-03-31T02:30:00", chrono_tz::Europe::Berlin).is_none());
    }

    #[test]
    fn truncation_per_granularity() {
        let w = wall(10, 7, 42, 900);
        assert_eq!(truncate(w, Granularity::Minute), wall(10, 7, 0, 0));
        assert_eq!(truncate(w, Granularity::Second), wall(10, 7, 42, 0));
        assert_eq!(format_key(w, Granularity::Minute), "2024-01-01T10:07");
        assert_eq!(format_key(w, Granularity::Second), "2024-01-01T10:07:42");
    }
}
