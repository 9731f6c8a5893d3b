//! Log output for scenario runs.
//!
//! Filtering follows `SCREENPLAY_LOG` (an `EnvFilter` directive such as
//! `screenplay=debug`), defaulting to `info`.

use crate::result::{ScreenplayError, ScreenplayResult};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SCREENPLAY_LOG";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one activity per line
    #[default]
    Pretty,
    /// One JSON object per event, for CI log collectors
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy()
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns `Config` if a global subscriber is already installed.
pub fn init(format: LogFormat) -> ScreenplayResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);
    let installed = match format {
        LogFormat::Pretty => builder.compact().try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    installed.map_err(|e| ScreenplayError::config(format!("logging already initialised: {e}")))
}
