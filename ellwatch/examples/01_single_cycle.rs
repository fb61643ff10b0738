use std::sync::Arc;

use ellwatch::{Dashboard, TaskType, TextChartRenderer, TextSummaryPresenter};
use tracing_subscriber::fmt::format::FmtSpan;

mod common;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,ellwatch=debug,ellwatch_http=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let dashboard = Dashboard::builder()
        .with_fetcher(common::get_fetcher())
        .with_renderer(Arc::new(TextChartRenderer::stdout()))
        .with_presenter(Arc::new(TextSummaryPresenter::stdout()))
        .build()?;

    let report = dashboard.run_cycle().await;
    println!(
        "cycle {}: {} buckets since {}, {} unparsable",
        report.cycle,
        report.series.len(),
        report.not_older_than,
        report.series.parse_failures
    );
    if let Some(label) = report.summary.get(TaskType::Account).latest.label() {
        println!("latest bucket: {label}");
    }
    Ok(())
}
