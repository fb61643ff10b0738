//! Mock history fetchers for tests and demos.
//!
//! - [`MockFetcher`] serves the deterministic [`fixtures`] for every category.
//! - [`DynamicFetcher`] defers each call to behaviors set through its
//!   [`DynamicFetcherController`].
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ellwatch_core::{EllError, HistoryFetcher, Measurement, TaskType};

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicFetcher, DynamicFetcherController, MockBehavior};

/// Fetcher backed by static fixtures.
///
/// The request window is ignored; every call returns the full fixture stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFetcher;

impl MockFetcher {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HistoryFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "ellwatch-mock"
    }

    async fn history(
        &self,
        task: TaskType,
        _not_older_than: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, EllError> {
        Ok(fixtures::by_task(task))
    }
}
