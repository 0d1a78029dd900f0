//! Logging setup
//!
//! Installs a `tracing-subscriber` writing to a file or stderr.
//!
//! ## Configuration priority
//!
//! 1. `log_level` / `log_file` connection properties (highest)
//! 2. `RUST_LOG` environment variable
//! 3. Default: `quarry_client=warn`
//!
//! ```bash
//! RUST_LOG=quarry_client=debug ./my_app
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Config;

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "quarry_client=warn";

/// Logging options taken from the connection configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Level or filter directive: "off", "error", "warn", "info", "debug",
    /// "trace", or a full directive such as `quarry_client=debug`
    pub level: Option<String>,
    /// Log file path; stderr when unset
    pub file: Option<PathBuf>,
}

impl From<&Config> for LogConfig {
    fn from(config: &Config) -> Self {
        Self {
            level: config.log_level.clone(),
            file: config.log_file.clone(),
        }
    }
}

/// Filter directive for a configured level
fn directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("quarry_client={}", level.to_lowercase())
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    match &config.level {
        Some(level) => EnvFilter::try_new(directive(level)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Initialize the tracing subscriber.
///
/// Runs at most once per process: the first connection configures logging,
/// later calls are no-ops. If the application already installed a global
/// subscriber, that one is kept.
pub fn init_logging(config: &LogConfig) {
    LOGGING_INITIALIZED.get_or_init(|| {
        if config
            .level
            .as_deref()
            .is_some_and(|level| level.eq_ignore_ascii_case("off"))
        {
            return;
        }

        let filter = build_filter(config);

        if let Some(path) = &config.file {
            let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("quarry-client: failed to open log file {}: {}", path.display(), e);
                    return;
                }
            };

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_target(false)
                        .with_ansi(false)
                        .with_timer(SystemTime),
                )
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_timer(SystemTime),
                )
                .try_init()
                .ok();
        }
    });
}
