//! Logging setup.
//!
//! Everything logs through `tracing`; this installs a single fmt subscriber
//! writing to stderr. `RUST_LOG` wins over the filter stored in settings.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when neither `RUST_LOG` nor the settings provide a valid one.
pub const DEFAULT_FILTER: &str = "info";

/// Build the env filter, preferring `RUST_LOG` over the configured directive.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Calling it twice is harmless: the second
/// attempt is ignored.
pub fn init(configured: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(build_filter(configured))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_falls_back() {
        // A garbage directive must not panic.
        let filter = build_filter("russia_map=[[[");
        let _ = filter.to_string();
    }

    #[test]
    fn test_init_twice_is_ignored() {
        init("debug");
        init("warn");
        tracing::info!("logging initialized twice without panicking");
    }
}
