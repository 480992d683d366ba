use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::analysis::{PolicyCategory, UserProfile};

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
    pub analysis: AnalysisConfig,
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
            analysis: AnalysisConfig::from_env()?,
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

/// Request defaults and listing windows for the policy service.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub default_age: u32,
    pub default_policy_type: String,
    pub default_claim_amount: f64,
    pub recent_limit: usize,
    pub stats_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_age: 35,
            default_policy_type: PolicyCategory::Health.label().to_string(),
            default_claim_amount: 500_000.0,
            recent_limit: 10,
            stats_window: 100,
        }
    }
}

impl AnalysisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let default_age = match env::var("CLAIMGUARD_DEFAULT_AGE") {
            Ok(raw) => UserProfile::parse_age(&raw).map_err(|_| ConfigError::InvalidDefaultAge)?,
            Err(_) => defaults.default_age,
        };

        let default_policy_type = env::var("CLAIMGUARD_DEFAULT_POLICY_TYPE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.default_policy_type);

        let default_claim_amount = match env::var("CLAIMGUARD_DEFAULT_CLAIM_AMOUNT") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite() && *amount > 0.0)
                .ok_or(ConfigError::InvalidClaimAmount)?,
            Err(_) => defaults.default_claim_amount,
        };

        Ok(Self {
            default_age,
            default_policy_type,
            default_claim_amount,
            recent_limit: limit_from_env("CLAIMGUARD_RECENT_LIMIT", defaults.recent_limit)?,
            stats_window: limit_from_env("CLAIMGUARD_STATS_WINDOW", defaults.stats_window)?,
        })
    }
}

fn limit_from_env(variable: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ConfigError::InvalidLimit { variable }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDefaultAge,
    InvalidClaimAmount,
    InvalidLimit { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDefaultAge => {
                write!(f, "CLAIMGUARD_DEFAULT_AGE must be a whole number between 0 and 120")
            }
            ConfigError::InvalidClaimAmount => {
                write!(f, "CLAIMGUARD_DEFAULT_CLAIM_AMOUNT must be a positive number")
            }
            ConfigError::InvalidLimit { variable } => {
                write!(f, "{variable} must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
