use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaskType;

/// Unified error type for the ellwatch workspace.
///
/// Fetch-side variants (`Transport`, `Status`, `Decode`, `FetchTimeout`) never
/// escape a poll cycle: the dashboard degrades them to an empty stream and logs
/// them. The remaining variants surface from builders and front-ends.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EllError {
    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with returned data (unparsable fields, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// The transport layer failed before a response was received.
    #[error("{fetcher} transport failed: {msg}")]
    Transport {
        /// Fetcher name that failed.
        fetcher: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The endpoint answered with a non-success status code.
    #[error("{fetcher} returned HTTP status {status}")]
    Status {
        /// Fetcher name that received the status.
        fetcher: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("{fetcher} returned a malformed body: {msg}")]
    Decode {
        /// Fetcher name that received the body.
        fetcher: String,
        /// Decoder message.
        msg: String,
    },

    /// A single history fetch exceeded the configured timeout.
    #[error("fetch timed out: {task} via {fetcher}")]
    FetchTimeout {
        /// Fetcher name that timed out.
        fetcher: String,
        /// Task category being fetched.
        task: TaskType,
    },

    /// A chart renderer or summary presenter failed to write its output.
    #[error("render failed: {0}")]
    Render(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl EllError {
    /// Helper: build a `Transport` error.
    pub fn transport(fetcher: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            fetcher: fetcher.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Status` error.
    pub fn status(fetcher: impl Into<String>, status: u16) -> Self {
        Self::Status {
            fetcher: fetcher.into(),
            status,
        }
    }

    /// Helper: build a `Decode` error.
    pub fn decode(fetcher: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            fetcher: fetcher.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `FetchTimeout` error.
    pub fn fetch_timeout(fetcher: impl Into<String>, task: TaskType) -> Self {
        Self::FetchTimeout {
            fetcher: fetcher.into(),
            task,
        }
    }

    /// Returns true for failures that the dashboard recovers from by
    /// substituting an empty stream.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. }
                | Self::Status { .. }
                | Self::Decode { .. }
                | Self::FetchTimeout { .. }
        )
    }
}

impl From<std::io::Error> for EllError {
    fn from(e: std::io::Error) -> Self {
        Self::Render(e.to_string())
    }
}
