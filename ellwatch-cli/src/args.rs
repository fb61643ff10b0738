use std::path::PathBuf;

use chrono_tz::Tz;
use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use ellwatch::{Granularity, MatchPolicy};

/// Output format of the dashboard on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Bar charts followed by the summary table.
    #[default]
    Text,
    /// One JSON object per cycle.
    Json,
}

#[derive(Parser, Debug)]
#[clap(author, version, about = "Poll a distinct-count statistics endpoint and chart the results", long_about = None)]
pub struct Args {
    /// TOML file with dashboard settings; flags override its values.
    #[clap(short, long, env = "ELLWATCH_CONFIG")]
    pub config: Option<PathBuf>,
    /// Statistics endpoint URL.
    #[clap(long, env = "ELLWATCH_BASE_URL")]
    pub base_url: Option<String>,
    /// Bucket width: `minute` or `second`. Without a config file this also
    /// picks the matching poll cadence.
    #[clap(short, long)]
    pub granularity: Option<Granularity>,
    /// Seconds between the starts of consecutive cycles.
    #[clap(short, long)]
    pub interval_secs: Option<u64>,
    /// Upper bound for one history fetch, in milliseconds.
    #[clap(long)]
    pub timeout_ms: Option<u64>,
    /// Number of buckets requested per cycle.
    #[clap(long)]
    pub retention_points: Option<u32>,
    /// Which sample claims a bucket: `first` or `closest`.
    #[clap(long)]
    pub match_policy: Option<MatchPolicy>,
    /// IANA zone the server writes timestamps in.
    #[clap(long)]
    pub source_tz: Option<Tz>,
    /// IANA zone for axis labels; defaults to the source zone.
    #[clap(long)]
    pub display_tz: Option<Tz>,
    /// Output format.
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Run a single cycle and exit.
    #[clap(long)]
    pub once: bool,
    /// Emit logs as JSON lines on stderr.
    #[clap(long)]
    pub log_json: bool,
    /// Serve built-in sample data instead of querying the endpoint.
    #[clap(long, env = "ELLWATCH_USE_MOCK", value_parser = env_switch())]
    pub mock: bool,
}

/// Parser for boolean switches that may come from the environment: empty,
/// `0`, `false`, `no`, `n`, and `off` are false, anything else is true.
fn env_switch() -> FalseyValueParser {
    FalseyValueParser::new()
}
