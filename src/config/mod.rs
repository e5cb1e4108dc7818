//! Runtime configuration, loaded from TOML.
//!
//! ```toml
//! [runtime]
//! unhandled_errors = "log"
//! print_changes = true
//!
//! [logging]
//! filter = "info,tca_runtime::changes=debug"
//! file = "/tmp/tca-demo.log"
//! ```

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{LoggingConfig, RuntimeConfig, RuntimeSection, UnhandledErrorPolicy};
