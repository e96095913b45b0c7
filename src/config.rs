use std::time::Duration;

use chrono::FixedOffset;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub pool_max_size: u32,
}

impl DatabaseConfig {
    /// libpq keyword/value connection string. Values are always quoted so
    /// passwords need no URL escaping.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            quote(&self.host),
            self.port,
            quote(&self.name),
            quote(&self.user),
            quote(&self.password)
        )
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub host: String,
    pub port: u16,
    pub max_page_size: i64,
    pub order_tx_timeout: Duration,
    pub stats_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            pool_max_size: positive(&lookup, "DB_POOL_MAX_SIZE", 10)?,
        };

        let offset_minutes: i32 = parse_or(&lookup, "STATS_UTC_OFFSET_MINUTES", 0)?;
        let stats_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::Invalid {
                key: "STATS_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
                reason: "offset must be within +/- 1439 minutes".to_string(),
            })?;

        let tx_timeout_ms: u64 = positive(&lookup, "ORDER_TX_TIMEOUT_MS", 5000)?;

        Ok(Self {
            database,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            max_page_size: positive(&lookup, "MAX_PAGE_SIZE", 100)?,
            order_tx_timeout: Duration::from_millis(tx_timeout_ms),
            stats_offset,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn positive<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default + ToString,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
