//! Logging initialization.
//!
//! Logs go to stderr so they never interleave with dashboard output on
//! stdout.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::LoggingConfig;

/// HTTP stack crates that are only interesting when something is wrong.
const QUIET_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn"];

/// Directive string for `level`, with the HTTP stack held at `warn`.
fn default_directives(level: &str) -> String {
    std::iter::once(level)
        .chain(QUIET_TARGETS.iter().copied())
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level. Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            subscriber.with(json_layer).try_init()
        }
        "compact" => {
            let compact_layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false);
            subscriber.with(compact_layer).try_init()
        }
        _ => {
            let pretty_layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stderr)
                .with_target(true);
            subscriber.with(pretty_layer).try_init()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_quiet_http_stack() {
        assert_eq!(
            default_directives("debug"),
            "debug,hyper=warn,hyper_util=warn,reqwest=warn"
        );
    }

    #[test]
    fn test_default_directives_parse() {
        for level in ["trace", "info", "probe_dash_client=debug"] {
            assert!(EnvFilter::try_new(default_directives(level)).is_ok());
        }
    }
}
