//! Environment-driven server configuration.
//!
//! # Invariants
//! - Required variables must be present and non-blank.
//! - `APP_PORT` must parse as a TCP port.

use article_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Value of `DB_PATH` that selects a throwaway in-memory store.
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidPort(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "{name} is required"),
            Self::InvalidPort(raw) => write!(f, "APP_PORT must be a port number, got `{raw}`"),
        }
    }
}

impl Error for ConfigError {}

/// Where the article store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub app_env: String,
    pub port: u16,
    pub db: DbLocation,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let app_env = required("APP_ENV")?;
        let raw_port = required("APP_PORT")?;
        let port = raw_port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw_port.clone()))?;
        let db = match required("DB_PATH")?.as_str() {
            IN_MEMORY_DB => DbLocation::Memory,
            path => DbLocation::File(PathBuf::from(path)),
        };
        let log_level = optional("LOG_LEVEL").unwrap_or_else(|| default_log_level().to_string());
        let log_dir = optional("LOG_DIR");

        Ok(Self {
            app_env,
            port,
            db,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DbLocation, ServerConfig};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from<'a>(
        pairs: &'a [(&'a str, &'a str)],
    ) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |name| map.get(name).map(|value| value.to_string())
    }

    #[test]
    fn full_environment_parses() {
        let env = [
            ("APP_ENV", "staging"),
            ("APP_PORT", "8080"),
            ("DB_PATH", "/var/lib/articles.sqlite3"),
            ("LOG_LEVEL", "warn"),
            ("LOG_DIR", "/var/log/articles"),
        ];
        let config = ServerConfig::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.app_env, "staging");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.db,
            DbLocation::File(PathBuf::from("/var/lib/articles.sqlite3"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/articles"));
    }

    #[test]
    fn optional_values_fall_back_and_memory_db_is_recognized() {
        let env = [("APP_ENV", "dev"), ("APP_PORT", "3000"), ("DB_PATH", ":memory:")];
        let config = ServerConfig::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(config.db, DbLocation::Memory);
        assert_eq!(config.log_level, article_core::default_log_level());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn missing_or_blank_required_value_is_reported_by_name() {
        let env = [("APP_ENV", "dev"), ("APP_PORT", "3000"), ("DB_PATH", "   ")];
        let err = ServerConfig::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DB_PATH"));
        assert_eq!(err.to_string(), "DB_PATH is required");

        let err = ServerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("APP_ENV"));
    }

    #[test]
    fn unparsable_port_is_rejected() {
        let env = [("APP_ENV", "dev"), ("APP_PORT", "80a"), ("DB_PATH", ":memory:")];
        let err = ServerConfig::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("80a".to_string()));
    }
}
