use ellwatch_core::{Measurement, Streams, TaskType};

// Naive wall-clock stamps, as the statistics server writes them.
const ACCOUNT: &[(&str, f64, Option<f64>)] = &[
    ("2024-01-01T10:00:02.118", 1041.7, Some(12.0)),
    ("2024-01-01T10:01:02.094", 1063.2, Some(14.0)),
    ("2024-01-01T10:02:01.987", 1058.9, Some(11.0)),
    ("2024-01-01T10:03:02.301", 1102.4, Some(16.0)),
    ("2024-01-01T10:04:02.015", 1097.6, None),
];

const IP: &[(&str, f64, Option<f64>)] = &[
    ("2024-01-01T10:00:03.412", 5310.2, Some(21.0)),
    ("2024-01-01T10:01:03.377", 5402.8, Some(19.0)),
    ("2024-01-01T10:03:03.250", 5521.5, Some(23.0)),
    ("2024-01-01T10:04:03.198", 5498.1, Some(20.0)),
];

const EMAIL_DOMAIN: &[(&str, f64, Option<f64>)] = &[
    ("2024-01-01T10:00:04.002", 88.4, None),
    ("2024-01-01T10:01:04.115", 90.1, None),
    ("2024-01-01T10:02:03.980", 89.6, None),
    ("2024-01-01T10:03:04.040", 92.5, None),
    ("2024-01-01T10:04:04.221", 92.4, None),
];

fn build(rows: &[(&str, f64, Option<f64>)]) -> Vec<Measurement> {
    rows.iter()
        .map(|&(ts, count, ms)| {
            let m = Measurement::new(ts, count);
            match ms {
                Some(ms) => m.with_processing_time(ms),
                None => m,
            }
        })
        .collect()
}

/// Five minutes of sample history for `task`.
///
/// The IP stream skips `10:02` and the e-mail domain stream never reports a
/// processing time.
#[must_use]
pub fn by_task(task: TaskType) -> Vec<Measurement> {
    match task {
        TaskType::Account => build(ACCOUNT),
        TaskType::Ip => build(IP),
        TaskType::EmailDomain => build(EMAIL_DOMAIN),
    }
}

/// All three sample streams.
#[must_use]
pub fn streams() -> Streams {
    TaskType::ALL.into_iter().map(|t| (t, by_task(t))).collect()
}
