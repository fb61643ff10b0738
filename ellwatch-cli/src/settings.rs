use std::path::Path;
use std::time::Duration;

use ellwatch::{DashboardConfig, EllError, Granularity};

use crate::args::Args;

/// Read a `DashboardConfig` from a TOML file. Missing keys keep their defaults.
pub fn load_file(path: &Path) -> Result<DashboardConfig, EllError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| EllError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&text)
        .map_err(|e| EllError::Config(format!("cannot parse {}: {e}", path.display())))
}

/// Merge the optional config file with command-line overrides and validate.
pub fn resolve(args: &Args) -> Result<DashboardConfig, EllError> {
    let mut cfg = match (&args.config, args.granularity) {
        (Some(path), _) => load_file(path)?,
        (None, Some(Granularity::Second)) => DashboardConfig::secondly(),
        (None, _) => DashboardConfig::minutely(),
    };

    if let Some(g) = args.granularity {
        cfg.granularity = g;
    }
    if let Some(url) = &args.base_url {
        cfg.base_url.clone_from(url);
    }
    if let Some(secs) = args.interval_secs {
        cfg.poll_interval = Duration::from_secs(secs);
    }
    if let Some(ms) = args.timeout_ms {
        cfg.fetch_timeout = Duration::from_millis(ms);
    }
    if let Some(n) = args.retention_points {
        cfg.retention_points = n;
    }
    if let Some(p) = args.match_policy {
        cfg.match_policy = p;
    }
    if let Some(tz) = args.source_tz {
        // Labels follow the source zone unless configured separately
        if cfg.display_tz == cfg.source_tz && args.display_tz.is_none() {
            cfg.display_tz = tz;
        }
        cfg.source_tz = tz;
    }
    if let Some(tz) = args.display_tz {
        cfg.display_tz = tz;
    }

    cfg.validate()?;
    Ok(cfg)
}
