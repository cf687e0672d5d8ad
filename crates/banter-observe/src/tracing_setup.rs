//! Tracing subscriber initialization.
//!
//! # Usage
//!
//! ```no_run
//! banter_observe::tracing_setup::init_tracing("warn");
//! ```

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG` when set; otherwise applies `default_filter`
/// (typically derived from the CLI verbosity flags).
///
/// Calling this twice is a no-op beyond the first call failing silently,
/// which keeps tests that race on initialization harmless.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing("warn");
        init_tracing("debug");
    }
}
