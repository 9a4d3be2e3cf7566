//! Handles settings for the application.
//!
//! Configuration is read from an optional `settings.toml` and from environment
//! variables prefixed with `EXPENSES`, e.g. `EXPENSES__AUTH__SECRET`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Database,
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Auth {
    /// Token lifetime; must be positive and representable.
    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_hours(self.token_ttl_hours)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "auth.token_ttl_hours must be a positive number of hours, got {}",
                    self.token_ttl_hours
                ))
            })
    }
}

fn default_token_ttl_hours() -> i64 {
    auth::token::DEFAULT_TOKEN_TTL_HOURS
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    pub auth: Auth,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("EXPENSES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        if settings.auth.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.secret must be set (EXPENSES__AUTH__SECRET)".to_string(),
            ));
        }
        settings.auth.token_ttl()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(token_ttl_hours: i64) -> Auth {
        Auth {
            secret: "s".to_string(),
            token_ttl_hours,
        }
    }

    #[test]
    fn token_ttl_accepts_positive_hours() {
        assert_eq!(auth(24).token_ttl().unwrap(), chrono::Duration::hours(24));
    }

    #[test]
    fn token_ttl_rejects_out_of_range_values() {
        for hours in [0, -1, i64::MAX] {
            assert!(auth(hours).token_ttl().is_err(), "{hours} must be rejected");
        }
    }
}
