use std::time::Duration;

use chrono_tz::Tz;
use reqwest::Client;
use url::Url;

use ellwatch_core::{DEFAULT_BASE_URL, DashboardConfig, EllError};

use crate::HttpHistoryFetcher;

const USER_AGENT: &str = concat!("ellwatch/", env!("CARGO_PKG_VERSION"));

/// Builder for [`HttpHistoryFetcher`].
///
/// Defaults: the local statistics endpoint, the default dashboard source zone,
/// and a 3 second connect timeout. The overall fetch deadline is enforced by
/// the dashboard, not here.
#[derive(Debug, Clone)]
pub struct HttpHistoryFetcherBuilder {
    base_url: Option<Url>,
    source_tz: Tz,
    client: Option<Client>,
    connect_timeout: Duration,
}

impl Default for HttpHistoryFetcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpHistoryFetcherBuilder {
    /// Returns a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: None,
            source_tz: DashboardConfig::default().source_tz,
            client: None,
            connect_timeout: Duration::from_secs(3),
        }
    }

    /// Endpoint to query.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Endpoint to query, parsed from a string.
    ///
    /// # Errors
    /// Returns `Config` if `url` is not a valid absolute URL.
    pub fn base_url_str(self, url: &str) -> Result<Self, EllError> {
        let parsed = Url::parse(url)
            .map_err(|e| EllError::Config(format!("invalid base_url {url:?}: {e}")))?;
        Ok(self.base_url(parsed))
    }

    /// Zone in which `finishedAt` is written.
    #[must_use]
    pub const fn source_tz(mut self, tz: Tz) -> Self {
        self.source_tz = tz;
        self
    }

    /// Reuse an existing HTTP client; `connect_timeout` is then ignored.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Connect timeout for a freshly built client.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build the fetcher.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpHistoryFetcher, EllError> {
        let base_url = match self.base_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| EllError::Config(format!("invalid default base_url: {e}")))?,
        };
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .user_agent(USER_AGENT)
                .connect_timeout(self.connect_timeout)
                .build()
                .map_err(|e| EllError::Config(format!("failed to build HTTP client: {e}")))?,
        };
        Ok(HttpHistoryFetcher::with_client(
            client,
            base_url,
            self.source_tz,
        ))
    }
}
