use crate::ranking::{ConfigurationIssue, WeightConfig};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let weights = env::var("RANKER_WEIGHTS")
            .ok()
            .filter(|raw| !raw.trim().is_empty());

        let dataset_path = env::var("RANKER_DATASET")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            ranking: RankingConfig {
                weights,
                dataset_path,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Defaults for ranking runs; command-line flags take precedence.
#[derive(Debug, Clone, Default)]
pub struct RankingConfig {
    /// Raw `RANKER_WEIGHTS` value, validated only when no explicit weights are given.
    pub weights: Option<String>,
    pub dataset_path: Option<PathBuf>,
}

impl RankingConfig {
    /// Picks `explicit` weights when present, else the configured ones, else the triage
    /// defaults.
    pub fn resolve_weights(
        &self,
        explicit: Option<WeightConfig>,
    ) -> Result<WeightConfig, ConfigError> {
        if let Some(weights) = explicit {
            return Ok(weights);
        }

        match &self.weights {
            Some(raw) => WeightConfig::parse(raw)
                .map_err(|source| ConfigError::InvalidWeights { source }),
            None => Ok(WeightConfig::patient_triage()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidWeights { source: ConfigurationIssue },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidWeights { source } => {
                write!(f, "RANKER_WEIGHTS is invalid: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidWeights { source } => Some(source),
        }
    }
}
