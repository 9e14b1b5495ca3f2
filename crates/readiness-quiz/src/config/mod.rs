use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::quiz::settings::{
    DEFAULT_ADVANCE_DELAY_MS, DEFAULT_LEAD_SUBMIT_DELAY_MS, DEFAULT_SESSION_TTL_SECS,
    DEFAULT_TRANSITION_MS,
};
use crate::quiz::{QuizSettings, ScoreDenominator};

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
    pub quiz: QuizSettings,
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

        let score_denominator = match env::var("QUIZ_SCORE_DENOMINATOR") {
            Ok(raw) => raw
                .parse::<ScoreDenominator>()
                .map_err(|_| ConfigError::InvalidDenominator(raw))?,
            Err(_) => ScoreDenominator::default(),
        };

        let quiz = QuizSettings {
            advance_delay_ms: whole_number_var(
                "QUIZ_ADVANCE_DELAY_MS",
                DEFAULT_ADVANCE_DELAY_MS,
            )?,
            transition_ms: whole_number_var("QUIZ_TRANSITION_MS", DEFAULT_TRANSITION_MS)?,
            lead_submit_delay_ms: whole_number_var(
                "QUIZ_LEAD_SUBMIT_DELAY_MS",
                DEFAULT_LEAD_SUBMIT_DELAY_MS,
            )?,
            score_denominator,
            session_ttl_secs: whole_number_var(
                "QUIZ_SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            quiz,
        })
    }
}

fn whole_number_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDuration { variable: name }),
        Err(_) => Ok(default),
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { variable: &'static str },
    InvalidDenominator(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { variable } => {
                write!(f, "{variable} must be a non-negative whole number")
            }
            ConfigError::InvalidDenominator(value) => write!(
                f,
                "QUIZ_SCORE_DENOMINATOR must be 'fixed' or 'answered', found '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDuration { .. }
            | ConfigError::InvalidDenominator(_) => None,
        }
    }
}
