//! Tracing setup for the recruitment backend: `RUST_LOG` wins when present,
//! the configured level otherwise, rendered compact and ANSI-free for
//! container log collectors.

use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Filter used when `RUST_LOG` is unset. A blank configured level quietly
/// becomes `info` so a stray empty `APP_LOG_LEVEL` never silences screening
/// verdicts or scheduling decisions.
fn fallback_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    let directive = log_level.trim();
    let directive = if directive.is_empty() {
        "info"
    } else {
        directive
    };
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::EnvFilter {
        value: log_level.to_string(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => fallback_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_levels_fall_back_to_info() {
        assert!(fallback_filter("   ").is_ok());
        assert!(fallback_filter("").is_ok());
    }

    #[test]
    fn directive_filters_are_accepted() {
        assert!(fallback_filter("hireflow=debug,info").is_ok());
    }

    #[test]
    fn invalid_directives_report_the_offending_value() {
        let error = fallback_filter("not a level").expect_err("directive must be rejected");
        assert!(error.to_string().contains("not a level"));
    }
}
