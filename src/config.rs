//! Service configuration: optional TOML file plus environment overrides

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EventsError;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_CONFIG_PATH: &str = "events_config.toml";
/// SQLite stands in for the `mongodb://localhost:27017` / `github_actions`
/// deployment; `MONGO_URI` is honored only when it holds a SQLite URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:github_actions.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Directory for rolling log files; console only when unset
    pub log_directory: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            log_directory: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `$EVENTS_CONFIG` (or the default file when it
    /// exists), then apply environment overrides.
    pub fn load() -> Result<Self, EventsError> {
        let explicit_path = std::env::var("EVENTS_CONFIG").ok();
        let path = explicit_path
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if explicit_path.is_some() || Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load and parse a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EventsError> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|e| {
            EventsError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&config_str).map_err(|e| {
            EventsError::ConfigError(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), EventsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        match (lookup("DATABASE_URL"), lookup("MONGO_URI")) {
            (Some(url), _) => self.database_url = url,
            (None, Some(uri)) if uri.starts_with("sqlite:") => self.database_url = uri,
            (None, Some(uri)) => {
                return Err(EventsError::ConfigError(format!(
                    "MONGO_URI '{}' is not supported: events are stored in SQLite, set DATABASE_URL (e.g. '{}')",
                    uri, DEFAULT_DATABASE_URL
                )));
            }
            (None, None) => {}
        }
        if let Some(max) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database_max_connections = max.parse().map_err(|_| {
                EventsError::ConfigError(format!(
                    "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{}'",
                    max
                ))
            })?;
        }
        if let Some(dir) = lookup("LOG_DIR") {
            self.log_directory = Some(PathBuf::from(dir));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_bind_all_interfaces_on_8080() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database_url, "sqlite:github_actions.db");
        assert!(config.log_directory.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            database_url = "sqlite:/var/lib/events/events.db"
            log_directory = "/var/log/events"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url, "sqlite:/var/lib/events/events.db");
        assert_eq!(config.log_directory, Some(PathBuf::from("/var/log/events")));
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.database_max_connections, 2);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn bad_connection_count_is_config_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "DATABASE_MAX_CONNECTIONS").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(EventsError::ConfigError(_))));
    }

    #[test]
    fn mongo_uri_is_accepted_only_for_sqlite() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| (key == "MONGO_URI").then(|| "sqlite:legacy.db".to_string()))
            .unwrap();
        assert_eq!(config.database_url, "sqlite:legacy.db");

        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "MONGO_URI").then(|| "mongodb://localhost:27017".to_string())
        });
        match result {
            Err(EventsError::ConfigError(message)) => {
                assert!(message.contains("DATABASE_URL"), "{}", message)
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn database_url_wins_over_mongo_uri() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| match key {
                "DATABASE_URL" => Some("sqlite:events.db".to_string()),
                "MONGO_URI" => Some("mongodb://localhost:27017".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.database_url, "sqlite:events.db");
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = AppConfig::from_file("/nonexistent/events_config.toml");
        assert!(matches!(result, Err(EventsError::ConfigError(_))));
    }
}
