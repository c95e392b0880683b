use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::applications::AttachmentPolicy;

/// Distinguishes runtime behavior for different stages of the application.
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
    pub catalog: CatalogConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let path = env::var("APP_JOBS_CATALOG")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let latency_ms = env::var("APP_SIMULATED_LATENCY_MS")
            .unwrap_or_else(|_| "0".to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidLatency)?;

        let max_resume_bytes = match env::var("APP_RESUME_MAX_BYTES") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidResumeLimit),
            },
            Err(_) => AttachmentPolicy::DEFAULT_MAX_BYTES,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig {
                path,
                latency: Duration::from_millis(latency_ms),
            },
            intake: IntakeConfig { max_resume_bytes },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where jobs come from and how slow the simulated backend is.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// `None` serves the built-in sample catalog.
    pub path: Option<PathBuf>,
    pub latency: Duration,
}

/// Limits applied to application submissions.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub max_resume_bytes: u64,
}

impl IntakeConfig {
    pub fn attachment_policy(&self) -> AttachmentPolicy {
        AttachmentPolicy::new(self.max_resume_bytes)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidLatency,
    InvalidResumeLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLatency => {
                write!(f, "APP_SIMULATED_LATENCY_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidResumeLimit => {
                write!(f, "APP_RESUME_MAX_BYTES must be a positive number of bytes")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
