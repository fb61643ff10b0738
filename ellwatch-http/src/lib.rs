//! ellwatch-http
//!
//! `HistoryFetcher` implementation for the statistics endpoint:
//!
//! `GET {base_url}?taskType=<TASK>&finishedAt=<YYYY-MM-DDTHH:mm:ss>`
//!
//! `finishedAt` is written as wall-clock time in the configured source zone.
//! The body is a JSON array of measurements; an empty body or `null` is read
//! as an empty stream.
#![warn(missing_docs)]

/// Builder for configuring the HTTP client and request parameters.
pub mod builder;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use url::Url;

use ellwatch_core::{DashboardConfig, EllError, HistoryFetcher, Measurement, TaskType};

pub use builder::HttpHistoryFetcherBuilder;

/// `strftime` pattern of the `finishedAt` query parameter.
pub const FINISHED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Public fetcher type. Most users construct it with
/// [`HttpHistoryFetcher::from_config`] or [`HttpHistoryFetcher::new_default`].
#[derive(Debug, Clone)]
pub struct HttpHistoryFetcher {
    client: Client,
    base_url: Url,
    source_tz: Tz,
}

impl HttpHistoryFetcher {
    /// Fetcher name used in logs and error values.
    pub const NAME: &'static str = "ellwatch-http";

    /// Start configuring a fetcher.
    #[must_use]
    pub fn builder() -> HttpHistoryFetcherBuilder {
        HttpHistoryFetcherBuilder::new()
    }

    /// Fetcher for `base_url` with a fresh client and the default source zone.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, EllError> {
        Self::builder().base_url(base_url).build()
    }

    /// Fetcher for the default local endpoint.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be constructed.
    pub fn new_default() -> Result<Self, EllError> {
        Self::builder().build()
    }

    /// Fetcher using the base URL and source zone of `cfg`.
    ///
    /// # Errors
    /// Returns `Config` if the base URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn from_config(cfg: &DashboardConfig) -> Result<Self, EllError> {
        Self::builder()
            .base_url_str(&cfg.base_url)?
            .source_tz(cfg.source_tz)
            .build()
    }

    /// Build from an existing `reqwest::Client`.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url, source_tz: Tz) -> Self {
        Self {
            client,
            base_url,
            source_tz,
        }
    }

    /// Endpoint queried by this fetcher.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for one category and window start.
    #[must_use]
    pub fn request_url(&self, task: TaskType, not_older_than: DateTime<Utc>) -> Url {
        let finished_at = not_older_than
            .with_timezone(&self.source_tz)
            .format(FINISHED_AT_FORMAT)
            .to_string();
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("taskType", task.as_str())
            .append_pair("finishedAt", &finished_at);
        url
    }

    fn decode(body: &[u8]) -> Result<Vec<Measurement>, EllError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice::<Option<Vec<Measurement>>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| EllError::decode(Self::NAME, e.to_string()))
    }
}

#[async_trait]
impl HistoryFetcher for HttpHistoryFetcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[tracing::instrument(name = "ellwatch::http::history", skip(self), fields(task = %task))]
    async fn history(
        &self,
        task: TaskType,
        not_older_than: DateTime<Utc>,
    ) -> Result<Vec<Measurement>, EllError> {
        let url = self.request_url(task, not_older_than);
        tracing::debug!(%url, "requesting history");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EllError::transport(Self::NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EllError::status(Self::NAME, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| EllError::transport(Self::NAME, e.to_string()))?;
        let stream = Self::decode(&body)?;
        tracing::debug!(count = stream.len(), "history decoded");
        Ok(stream)
    }
}
