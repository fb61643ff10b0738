use ellwatch_core::{
    Granularity, LatestPoint, Measurement, ProcessingTime, ReconcileOptions, Streams, TaskType,
    latest, reconcile, summarize,
};

fn m(ts: &str, count: f64) -> Measurement {
    Measurement::new(ts, count)
}

fn minute() -> ReconcileOptions {
    ReconcileOptions::utc(Granularity::Minute)
}

#[test]
fn empty_input_yields_empty_axis_and_no_data() {
    let streams = Streams::default();
    let s = reconcile(&streams, &minute());
    assert!(s.is_empty());
    for t in TaskType::ALL {
        assert!(s.values(t).is_empty());
    }

    let summary = summarize(&streams, &s);
    for t in TaskType::ALL {
        let row = summary.get(t);
        assert_eq!(row.latest, LatestPoint::NoData);
        assert_eq!(row.processing_time, ProcessingTime::NoData);
    }
}

#[test]
fn near_duplicates_collapse_and_first_in_stream_order_wins() {
    let streams = Streams::new(
        vec![m("2024-01-01T10:00:30", 8.0), m("2024-01-01T10:00:00", 5.0)],
        vec![],
        vec![],
    );
    let s = reconcile(&streams, &minute());
    assert_eq!(s.len(), 1);
    assert_eq!(s.values(TaskType::Account), &[8]);
}

#[test]
fn sparse_streams_default_to_zero() {
    let streams = Streams::new(
        vec![m("2024-01-01T10:00:00", 10.0), m("2024-01-01T10:02:00", 12.0)],
        vec![m("2024-01-01T10:05:00", 4.0)],
        vec![],
    );
    let s = reconcile(&streams, &minute());
    let labels: Vec<&str> = s.labels().collect();
    assert_eq!(labels, ["10:00", "10:02", "10:05"]);
    assert_eq!(s.values(TaskType::Account), &[10, 12, 0]);
    assert_eq!(s.values(TaskType::Ip), &[0, 0, 4]);
    assert_eq!(s.values(TaskType::EmailDomain), &[0, 0, 0]);
}

#[test]
fn unsorted_input_produces_ascending_axis() {
    let streams = Streams::new(
        vec![m("2024-01-01T10:04:00", 1.0), m("2024-01-01T10:01:00", 2.0)],
        vec![m("2024-01-01T10:03:00", 3.0)],
        vec![m("2024-01-01T09:59:00", 4.0)],
    );
    let s = reconcile(&streams, &minute());
    let labels: Vec<&str> = s.labels().collect();
    assert_eq!(labels, ["09:59", "10:01", "10:03", "10:04"]);
}

#[test]
fn unparsable_timestamps_are_counted_not_fatal() {
    let streams = Streams::new(
        vec![m("not a time", 99.0), m("2024-01-01T10:00:00", 1.0)],
        vec![m("2024-13-45T99:00:00", 5.0)],
        vec![],
    );
    let s = reconcile(&streams, &minute());
    assert_eq!(s.parse_failures, 2);
    assert_eq!(s.len(), 1);
    assert_eq!(s.values(TaskType::Account), &[1]);
    assert_eq!(s.values(TaskType::Ip), &[0]);
}

#[test]
fn latest_point_reads_highest_bucket() {
    let streams = Streams::new(
        vec![m("2024-01-01T10:00:00", 10.0), m("2024-01-01T10:01:00", 11.4)],
        vec![m("2024-01-01T10:00:00", 3.0)],
        vec![m("2024-01-01T10:01:20", 2.5)],
    );
    let s = reconcile(&streams, &minute());
    let [account, ip, domain] = latest(&s);
    assert_eq!(account.count(), Some(11));
    assert_eq!(account.label(), Some("10:01"));
    // IP had nothing in the last bucket: a real zero, not "no data".
    assert_eq!(ip.count(), Some(0));
    assert_eq!(domain.count(), Some(3));
}

#[test]
fn default_options_use_seoul_end_to_end() {
    let streams = Streams::new(vec![m("2024-01-01T10:00:00", 42.6)], vec![], vec![]);
    let s = reconcile(&streams, &ReconcileOptions::default());
    assert_eq!(s.axis[0].label, "10:00");
    assert_eq!(s.axis[0].at.to_rfc3339(), "2024-01-01T01:00:00+00:00");
    assert_eq!(s.values(TaskType::Account), &[43]);
}

#[test]
fn offset_timestamps_bucket_in_source_zone() {
    let streams = Streams::new(
        vec![m("2024-01-01T01:00:20Z", 9.0)],
        vec![m("2024-01-01T10:00:00+09:00", 4.0)],
        vec![],
    );
    let s = reconcile(&streams, &ReconcileOptions::default());
    let labels: Vec<&str> = s.labels().collect();
    assert_eq!(labels, ["10:00"]);
    assert_eq!(s.values(TaskType::Account), &[9]);
    assert_eq!(s.values(TaskType::Ip), &[4]);
}

#[test]
fn repeated_fall_back_hour_matches_its_own_sample() {
    // 06:30Z is the second 01:30 in New York on 2024-11-03 (EST).
    let ny = chrono_tz::America::New_York;
    let opts = ReconcileOptions {
        source_tz: ny,
        display_tz: ny,
        ..minute()
    };
    let streams = Streams::new(vec![m("2024-11-03T06:30:00Z", 7.0)], vec![], vec![]);
    let s = reconcile(&streams, &opts);
    assert_eq!(s.len(), 1);
    assert_eq!(s.axis[0].label, "01:30");
    assert_eq!(s.axis[0].at.to_rfc3339(), "2024-11-03T06:30:00+00:00");
    assert_eq!(s.values(TaskType::Account), &[7]);
    assert_eq!(s.parse_failures, 0);
}
