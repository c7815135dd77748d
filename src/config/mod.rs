use std::env;
use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 3306;
const DEFAULT_DB_USER: &str = "root";
const DEFAULT_DB_NAME: &str = "sata_events";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_PORT: u16 = 3001;
pub(crate) const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// the defaults for every unset key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            db_host: text("DB_HOST", DEFAULT_DB_HOST),
            db_port: parse_or(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            db_user: text("DB_USER", DEFAULT_DB_USER),
            db_password: text("DB_PASSWORD", ""),
            db_name: text("DB_NAME", DEFAULT_DB_NAME),
            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            cors_allowed_origins: text("CORS_ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS),
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .database(&self.db_name);

        if self.db_password.is_empty() {
            options
        } else {
            options.password(&self.db_password)
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 3306);
        assert_eq!(config.db_user, "root");
        assert_eq!(config.db_password, "");
        assert_eq!(config.db_name, "sata_events");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.port, 3001);
        assert_eq!(config.cors_allowed_origins, "http://localhost:3000");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_USER", "calendar"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "agenda"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.db_user, "calendar");
        assert_eq!(config.db_password, "s3cret");
        assert_eq!(config.db_name, "agenda");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();

        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
    }
}
