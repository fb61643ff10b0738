//! Task categories, configuration primitives, and the error type shared by all
//! ellwatch crates.
#![warn(missing_docs)]

mod config;
mod error;
mod task;

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_RETENTION_POINTS, DashboardConfig, Granularity, MatchPolicy,
    duration_ms,
};
pub use error::EllError;
pub use task::TaskType;
