//! `tracing` subscriber setup for hosts and demos.
//!
//! Library code only emits events; installing a subscriber is the host's call.
//! `RUST_LOG` takes precedence over [`LoggingConfig::level`].

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Parse a level directive such as `"info"` or `"rawpoint=trace,warn"`.
fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|e| Error::invalid_config(format!("logging.level {level:?}: {e}")))
}

/// Install the global subscriber, writing to stderr so stdout stays free for
/// event output.
///
/// A bad `level` is an error. A subscriber that is already installed is kept.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().with_target(false).try_init()
    };

    if installed.is_err() {
        tracing::debug!("global subscriber already set; keeping it");
    }
    Ok(())
}
