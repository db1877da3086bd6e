//! Process-wide log subscriber.

use tracing_subscriber::{fmt, EnvFilter};

const FALLBACK_LEVEL: &str = "info";

/// Installs the global fmt subscriber.
///
/// A non-empty `RUST_LOG` wins; otherwise `level` applies to every target.
/// `level` is `AppConfig::log_level`, which already carries `LOG_LEVEL`.
pub fn init_tracing(level: &str) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), level);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));

    fmt().with_env_filter(filter).with_target(true).init();
}

fn filter_directive(rust_log: Option<String>, level: &str) -> String {
    rust_log
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| level.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_configured_level() {
        let directive = filter_directive(Some("lead_server=debug".to_string()), "warn");
        assert_eq!(directive, "lead_server=debug");
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn configured_level_applies_without_rust_log() {
        assert_eq!(filter_directive(None, "warn"), "warn");
        assert_eq!(filter_directive(Some("  ".to_string()), "debug"), "debug");
    }
}
