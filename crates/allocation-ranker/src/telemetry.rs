use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Targets that follow the configured level. Everything else logs at `warn` and above.
const RANKER_TARGETS: [&str; 2] = ["allocation_ranker", "allocation_ranker_cli"];

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter {
        directives: String,
        source: ParseError,
    },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { directives, .. } => {
                write!(f, "invalid log filter '{}'", directives)
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "tracing subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Expands a bare level such as `debug` into per-target directives for the ranker crates.
/// Values that already carry directives are passed through untouched.
pub fn filter_directives(log_level: &str) -> String {
    let level = match log_level.trim() {
        "" => "info",
        level => level,
    };
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    RANKER_TARGETS
        .iter()
        .fold(String::from("warn"), |directives, target| {
            format!("{directives},{target}={level}")
        })
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = filter_directives(&config.log_level);
    EnvFilter::try_new(&directives)
        .map_err(|source| TelemetryError::InvalidFilter { directives, source })
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured level. Logs go to
/// stderr so rendered reports own stdout.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_is_scoped_to_ranker_crates() {
        assert_eq!(
            filter_directives("debug"),
            "warn,allocation_ranker=debug,allocation_ranker_cli=debug"
        );
        assert_eq!(
            filter_directives("  "),
            "warn,allocation_ranker=info,allocation_ranker_cli=info"
        );
    }

    #[test]
    fn explicit_directives_pass_through() {
        assert_eq!(filter_directives("csv=trace"), "csv=trace");
        assert_eq!(
            filter_directives("info,allocation_ranker=trace"),
            "info,allocation_ranker=trace"
        );
    }

    #[test]
    fn expanded_directives_build_a_filter() {
        assert!(EnvFilter::try_new(filter_directives("trace")).is_ok());
    }
}
