use std::sync::Arc;
use std::time::Duration;

use ellwatch::{Dashboard, DashboardConfig, JsonRenderer};

mod common;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let json = Arc::new(JsonRenderer::stdout());
    let dashboard = Arc::new(
        Dashboard::builder()
            .with_fetcher(common::get_fetcher())
            .with_renderer(json.clone())
            .with_presenter(json)
            .config(DashboardConfig::secondly())
            .poll_interval(Duration::from_secs(1))
            .build()?,
    );

    // Three cycles: at 0s, 1s, and 2s.
    let handle = dashboard.spawn();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    handle.stop().await;

    println!("ran {} cycles", dashboard.cycles());
    Ok(())
}
