//! Non-fatal runtime warnings.
//!
//! Logic errors in feature composition (an action for a dismissed child, a
//! stack action for a popped element) are reported here instead of panicking.

/// Report a logic error detected by the runtime.
pub fn runtime_warning(category: &str, message: &str) {
    tracing::warn!(
        target: "tca_runtime::runtime",
        category,
        "{message}"
    );
}
