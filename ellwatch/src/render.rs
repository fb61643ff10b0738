//! Terminal and JSON sinks for aligned series and summaries.
//!
//! Every sink owns its writer behind a `Mutex` so one instance can be shared
//! as `Arc<dyn ChartRenderer>` / `Arc<dyn SummaryPresenter>`.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};

use ellwatch_core::{
    AlignedSeries, ChartRenderer, DashboardSummary, EllError, LatestPoint, ProcessingTime,
    SummaryPresenter, TaskType,
};

const DEFAULT_BAR_WIDTH: usize = 40;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Draws one horizontal bar chart per category.
///
/// Bars are scaled against the category's own maximum with the axis starting
/// at zero, so an all-zero category draws no bars.
pub struct TextChartRenderer<W> {
    out: Mutex<W>,
    bar_width: usize,
}

impl TextChartRenderer<Stdout> {
    /// Renderer writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TextChartRenderer<W> {
    /// Renderer writing to `out` with the default bar width.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    /// Set the width of the longest bar, in characters.
    #[must_use]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width.max(1);
        self
    }

    /// Consume the renderer and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn bar_len(&self, value: u64, max: u64) -> usize {
        if max == 0 {
            return 0;
        }
        ((value as f64 / max as f64) * self.bar_width as f64).round() as usize
    }

    fn write_chart(&self, out: &mut W, series: &AlignedSeries) -> io::Result<()> {
        for task in TaskType::ALL {
            writeln!(out, "{} ({})", task.title(), task.unit())?;
            if series.is_empty() {
                writeln!(out, "  (no data)")?;
                continue;
            }
            let values = series.values(task);
            let max = values.iter().copied().max().unwrap_or(0);
            let digits = max.to_string().len();
            for (label, &v) in series.labels().zip(values) {
                let bar = "#".repeat(self.bar_len(v, max));
                writeln!(
                    out,
                    "  {label} |{bar:<width$} {v:>digits$}",
                    width = self.bar_width
                )?;
            }
        }
        writeln!(out)?;
        out.flush()
    }
}

impl<W: Write + Send> ChartRenderer for TextChartRenderer<W> {
    fn render(&self, series: &AlignedSeries) -> Result<(), EllError> {
        let mut out = lock(&self.out);
        self.write_chart(&mut out, series)?;
        Ok(())
    }
}

/// Writes the three-row summary table: latest value, its label, and the
/// average processing time.
pub struct TextSummaryPresenter<W> {
    out: Mutex<W>,
}

impl TextSummaryPresenter<Stdout> {
    /// Presenter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TextSummaryPresenter<W> {
    /// Presenter writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the presenter and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> SummaryPresenter for TextSummaryPresenter<W> {
    fn present(&self, summary: &DashboardSummary) -> Result<(), EllError> {
        let mut out = lock(&self.out);
        for row in &summary.rows {
            let (value, label) = match &row.latest {
                LatestPoint::NoData => ("-".to_string(), "-"),
                LatestPoint::Value { count, label } => (count.to_string(), label.as_str()),
            };
            writeln!(
                out,
                "{:<16} | {:>10} {:<7} | {:<8} {}",
                row.task.title(),
                value,
                row.task.unit(),
                label,
                row.processing_time
            )?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    latest: Option<u64>,
    label: Option<&'a str>,
    avg_processing_time_ms: Option<f64>,
    avg_time: String,
}

impl<'a> SummaryRow<'a> {
    fn new(latest: &'a LatestPoint, pt: ProcessingTime) -> Self {
        Self {
            latest: latest.count(),
            label: latest.label(),
            avg_processing_time_ms: match pt {
                ProcessingTime::NoData => None,
                ProcessingTime::Zero => Some(0.0),
                ProcessingTime::Mean(ms) => Some(ms),
            },
            avg_time: pt.to_string(),
        }
    }
}

/// Emits one JSON object per cycle as a single line.
///
/// Register the same instance as both renderer and presenter: `render`
/// stages the series part and `present` completes the object and writes it.
///
/// ```json
/// {"labels":["10:00"],"keys":["2024-01-01T10:00"],"account":[43],"ip":[0],"domain":[0],
///  "parse_failures":0,"summary":{"account":{"latest":43,"label":"10:00",...},...}}
/// ```
pub struct JsonRenderer<W> {
    out: Mutex<W>,
    staged: Mutex<Option<Map<String, Value>>>,
}

impl JsonRenderer<Stdout> {
    /// Renderer writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonRenderer<W> {
    /// Renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            staged: Mutex::new(None),
        }
    }

    /// Consume the renderer and return its writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn series_doc(series: &AlignedSeries) -> Map<String, Value> {
        let mut doc = Map::new();
        doc.insert(
            "labels".into(),
            series.labels().map(Value::from).collect(),
        );
        doc.insert("keys".into(), series.keys().map(Value::from).collect());
        for task in TaskType::ALL {
            doc.insert(
                task.key().into(),
                series.values(task).iter().map(|&v| Value::from(v)).collect(),
            );
        }
        doc.insert("parse_failures".into(), Value::from(series.parse_failures));
        doc
    }

    fn summary_doc(summary: &DashboardSummary) -> Result<Value, EllError> {
        let mut rows = Map::new();
        for row in &summary.rows {
            let v = serde_json::to_value(SummaryRow::new(&row.latest, row.processing_time))
                .map_err(|e| EllError::Render(e.to_string()))?;
            rows.insert(row.task.key().into(), v);
        }
        Ok(Value::Object(rows))
    }
}

impl<W: Write + Send> ChartRenderer for JsonRenderer<W> {
    fn render(&self, series: &AlignedSeries) -> Result<(), EllError> {
        *lock(&self.staged) = Some(Self::series_doc(series));
        Ok(())
    }
}

impl<W: Write + Send> SummaryPresenter for JsonRenderer<W> {
    fn present(&self, summary: &DashboardSummary) -> Result<(), EllError> {
        let mut doc = lock(&self.staged)
            .take()
            .unwrap_or_else(|| Self::series_doc(&AlignedSeries::default()));
        doc.insert("summary".into(), Self::summary_doc(summary)?);

        let mut out = lock(&self.out);
        serde_json::to_writer(&mut *out, &doc).map_err(|e| EllError::Render(e.to_string()))?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
