//! `ellwatch` binary: polls the statistics endpoint and draws the dashboard
//! on stdout. Logs go to stderr, filtered by `RUST_LOG`.

mod args;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ellwatch::{
    Dashboard, DashboardConfig, EllError, HistoryFetcher, JsonRenderer, TextChartRenderer,
    TextSummaryPresenter,
};
use ellwatch_http::HttpHistoryFetcher;
use ellwatch_mock::MockFetcher;
use tracing_subscriber::EnvFilter;

use args::{Args, Format};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn fetcher(args: &Args, cfg: &DashboardConfig) -> Result<Arc<dyn HistoryFetcher>, EllError> {
    if args.mock {
        tracing::info!("using built-in sample data");
        return Ok(Arc::new(MockFetcher::new()));
    }
    Ok(Arc::new(HttpHistoryFetcher::from_config(cfg)?))
}

fn build(args: &Args) -> Result<Dashboard, EllError> {
    let cfg = settings::resolve(args)?;
    let builder = Dashboard::builder()
        .with_fetcher(fetcher(args, &cfg)?)
        .config(cfg);
    let builder = match args.format {
        Format::Text => builder
            .with_renderer(Arc::new(TextChartRenderer::stdout()))
            .with_presenter(Arc::new(TextSummaryPresenter::stdout())),
        Format::Json => {
            let json = Arc::new(JsonRenderer::stdout());
            builder.with_renderer(json.clone()).with_presenter(json)
        }
    };
    builder.build()
}

async fn run(args: &Args) -> Result<(), EllError> {
    let dashboard = Arc::new(build(args)?);
    tracing::info!(
        base_url = %dashboard.config().base_url,
        granularity = ?dashboard.config().granularity,
        "dashboard ready"
    );

    if args.once {
        let _report = dashboard.run_cycle().await;
        return Ok(());
    }

    let handle = dashboard.spawn();
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c; stopping");
    }
    handle.stop().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_json);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ellwatch: {e}");
            ExitCode::FAILURE
        }
    }
}
