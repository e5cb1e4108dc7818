use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Environment variable overriding the configured filter directive.
pub const LOG_ENV: &str = "TCA_RUNTIME_LOG";

/// Initialize tracing from the logging section of the config.
///
/// `TCA_RUNTIME_LOG` takes precedence over `config.filter`. Logs go to
/// `config.file` when set, stderr otherwise. Does nothing if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if let Some(path) = &config.file {
        match std::fs::File::create(path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .with_timer(UtcTime::rfc_3339());
                let _ = registry.with(file_layer).try_init();
                return;
            }
            Err(err) => {
                eprintln!("Warning: Failed to create log file {}: {}", path.display(), err);
            }
        }
    }

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(UtcTime::rfc_3339());
    let _ = registry.with(stderr_layer).try_init();
}
