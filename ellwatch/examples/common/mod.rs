use std::sync::Arc;

use ellwatch::HistoryFetcher;

/// Return a fetcher for examples.
///
/// # Panics
/// Panics if the HTTP client cannot be constructed.
#[must_use]
pub fn get_fetcher() -> Arc<dyn HistoryFetcher> {
    if std::env::var("ELLWATCH_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Fetcher for CI) ---");
        Arc::new(ellwatch_mock::MockFetcher::new())
    } else {
        Arc::new(ellwatch_http::HttpHistoryFetcher::new_default().expect("http client"))
    }
}
