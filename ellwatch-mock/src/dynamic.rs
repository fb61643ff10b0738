use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use ellwatch_core::{EllError, HistoryFetcher, Measurement, TaskType};

/// Instruction for how a fetch should behave for a given category.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(EllError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<TaskType, MockBehavior<Vec<Measurement>>>,
    requests: Vec<(TaskType, DateTime<Utc>)>,
}

/// Controller handle used by tests to drive the dynamic fetcher from the outside.
pub struct DynamicFetcherController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicFetcherController {
    /// Set the behavior for fetches of a specific category.
    pub async fn set_behavior(&self, task: TaskType, behavior: MockBehavior<Vec<Measurement>>) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(task, behavior);
    }

    /// Return a copy of the request log, in call order.
    pub async fn requests(&self) -> Vec<(TaskType, DateTime<Utc>)> {
        self.state.lock().await.requests.clone()
    }

    /// Number of fetches issued for one category.
    pub async fn request_count(&self, task: TaskType) -> usize {
        let guard = self.state.lock().await;
        guard.requests.iter().filter(|(t, _)| *t == task).count()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.requests.clear();
    }
}

/// A fetcher that defers all behavior to an external controller.
///
/// Categories without a configured behavior answer with an empty stream.
pub struct DynamicFetcher {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicFetcher {
    /// Create a new dynamic fetcher and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn HistoryFetcher>, DynamicFetcherController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicFetcherController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn HistoryFetcher>, controller)
    }
}

#[async_trait]
impl HistoryFetcher for DynamicFetcher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn history(
        &self,
        task: TaskType,
        not_older_than: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, EllError> {
        // Snapshot the behavior without holding the lock across the hang
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push((task, not_older_than));
            guard.rules.get(&task).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(ms)) => Ok(ms),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Ok(Vec::new()),
        }
    }
}
