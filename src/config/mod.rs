pub mod app;

pub use app::{parse_duration, AppConfig, ConfigError, JwtConfig, OpenAiConfig};
