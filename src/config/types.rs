use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store and effect runtime behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSection {
    /// What to do when an effect body returns an error nobody handled.
    #[serde(default)]
    pub unhandled_errors: UnhandledErrorPolicy,
    /// Wrap root reducers in `PrintChanges` (default: false).
    #[serde(default)]
    pub print_changes: bool,
}

/// Handling of effect errors that were not converted into actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnhandledErrorPolicy {
    /// Panic the effect task with a diagnostic. Default in debug builds.
    Panic,
    /// Log at `error` level and count it. Default in release builds.
    Log,
}

impl Default for UnhandledErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Panic
        } else {
            Self::Log
        }
    }
}

/// Tracing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive (default: "info").
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            file: None,
        }
    }
}
