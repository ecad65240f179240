use crate::services::token_service::checked_lifetime;
use std::{env, net::IpAddr, time::Duration};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
    pub cors_origin: Option<String>,
    pub jwt: JwtConfig,
    pub openai: OpenAiConfig,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in: Duration,
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("cors_origin", &self.cors_origin)
            .field("jwt", &self.jwt)
            .field("openai", &self.openai)
            .finish()
    }
}

pub const DEFAULT_TOKEN_TTL: &str = "7d";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

impl AppConfig {
    /// Reads the environment. Refuses to produce a config without a signing
    /// secret or a completion API key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = current_environment();

        let secret = required("JWT_SECRET")?;
        if environment == "production" && secret.len() < 32 {
            warn!("JWT_SECRET is shorter than 32 bytes; use a longer random secret in production");
        }
        let expires_in = parse_duration(
            &env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.to_string()),
        )
        .map_err(|reason| ConfigError::Invalid {
            key: "JWT_EXPIRES_IN",
            reason,
        })?;
        checked_lifetime(expires_in).map_err(|e| ConfigError::Invalid {
            key: "JWT_EXPIRES_IN",
            reason: e.to_string(),
        })?;

        let api_key = required("OPENAI_API_KEY")?;
        let timeout_secs = match env::var("OPENAI_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "OPENAI_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => 60,
        };

        let host = env::var("HOST")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "HOST",
                reason: e.to_string(),
            })?;
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?;

        Ok(AppConfig {
            host,
            port,
            environment,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            jwt: JwtConfig {
                secret,
                expires_in,
            },
            openai: OpenAiConfig {
                api_key,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Parses a human duration (`7d`, `12h`, `30m`, `1h 30m`) or a bare number
/// of seconds.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    humantime::parse_duration(value)
        .map_err(|e| format!("'{}' is not a duration like 7d, 12h, 30m or 3600: {}", value, e))
}
