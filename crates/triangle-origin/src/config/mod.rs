use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::workflows::origin::config::DEFAULT_CONTENT_TOLERANCE;
use crate::workflows::origin::EngineConfig;

const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2_000;

/// Distinguishes runtime behavior for different stages of the service.
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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub origin: OriginSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            origin: OriginSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Reference data location and engine tuning for origin qualification.
#[derive(Debug, Clone)]
pub struct OriginSettings {
    pub rate_table_path: Option<PathBuf>,
    pub lookup_timeout: Duration,
    pub content_tolerance: f64,
}

impl OriginSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let rate_table_path = env::var("ORIGIN_RATE_TABLE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let lookup_timeout = match env::var("ORIGIN_LOOKUP_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
        };

        let content_tolerance = match env::var("ORIGIN_CONTENT_TOLERANCE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|tolerance| tolerance.is_finite() && *tolerance >= 0.0)
                .ok_or(ConfigError::InvalidTolerance)?,
            Err(_) => DEFAULT_CONTENT_TOLERANCE,
        };

        Ok(Self {
            rate_table_path,
            lookup_timeout,
            content_tolerance,
        })
    }

    /// Standard USMCA rule set with the configured tolerance applied.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::standard().with_tolerance(self.content_tolerance)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidTolerance,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "ORIGIN_LOOKUP_TIMEOUT_MS must be a positive number of milliseconds")
            }
            ConfigError::InvalidTolerance => {
                write!(f, "ORIGIN_CONTENT_TOLERANCE must be a non-negative percentage")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidTolerance => None,
        }
    }
}
