//! API configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                     | Default        |
//! |------------------------------|----------------|
//! | `PLATTER_BIND_ADDR`          | `0.0.0.0`      |
//! | `PLATTER_PORT`               | `5000`         |
//! | `PLATTER_DB_PATH`            | `./platter.db` |
//! | `PLATTER_DB_MAX_CONNECTIONS` | `5`            |
//! | `PLATTER_JWT_SECRET`         | dev secret     |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use platter_db::DbConfig;

/// Shortest accepted signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 16;

const DEV_JWT_SECRET: &str = "platter-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub db_max_connections: u32,
    /// HS256 secret shared with the identity service.
    pub jwt_secret: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            bind_addr: parse_or(&lookup, "PLATTER_BIND_ADDR", "0.0.0.0")?,
            port: parse_or(&lookup, "PLATTER_PORT", "5000")?,
            database_path: lookup("PLATTER_DB_PATH")
                .unwrap_or_else(|| "./platter.db".to_string())
                .into(),
            db_max_connections: parse_or(&lookup, "PLATTER_DB_MAX_CONNECTIONS", "5")?,
            jwt_secret: lookup("PLATTER_JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
        };

        if config.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakSecret(MIN_JWT_SECRET_LEN));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "PLATTER_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.db_max_connections)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("PLATTER_JWT_SECRET must be at least {0} characters")]
    WeakSecret(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.database_path, PathBuf::from("./platter.db"));
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("PLATTER_BIND_ADDR", "127.0.0.1"),
            ("PLATTER_PORT", "8080"),
            ("PLATTER_DB_PATH", "/var/lib/platter/platter.db"),
            ("PLATTER_JWT_SECRET", "a-long-enough-test-secret"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.jwt_secret, "a-long-enough-test-secret");
    }

    #[test]
    fn test_invalid_values() {
        let err = ApiConfig::from_lookup(lookup(&[("PLATTER_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "PLATTER_PORT"));

        let err = ApiConfig::from_lookup(lookup(&[("PLATTER_DB_MAX_CONNECTIONS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = ApiConfig::from_lookup(lookup(&[("PLATTER_JWT_SECRET", "short")])).unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret(16)));
    }
}
