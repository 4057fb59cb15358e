use crate::assessment::{ContextParseError, DmfContext};
use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different deployments of the tool.
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
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let default_context = match env::var("PSA_DEFAULT_CONTEXT") {
            Ok(raw) => raw
                .parse::<DmfContext>()
                .map_err(|source| ConfigError::InvalidContext { source })?,
            Err(_) => DmfContext::Court,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringConfig { default_context },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings applied when an assessment does not state its own decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub default_context: DmfContext,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_context: DmfContext::Court,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidContext { source: ContextParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidContext { source } => {
                write!(f, "PSA_DEFAULT_CONTEXT must be court or booking ({source})")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidContext { source } => Some(source),
        }
    }
}
