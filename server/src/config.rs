//! Process configuration read from environment variables.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a port number, got `{value}`")]
    InvalidPort { key: &'static str, value: String },

    #[error("{key} must be `docstore` or `memory`, got `{value}`")]
    InvalidStorage { key: &'static str, value: String },
}

/// Which `TodoRepository` the process runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    DocumentStore,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::DocumentStore => f.write_str("docstore"),
            StorageBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub app_env: String,
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub docstore_url: String,
    pub docstore_database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: "development".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            storage: StorageBackend::DocumentStore,
            docstore_url: "http://127.0.0.1:8081".to_string(),
            docstore_database: "default".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or empty keys keep their
    /// defaults; keys are matched exactly.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut config = Self::default();

        if let Some(value) = get("APP_ENV") {
            config.app_env = value;
        }
        if let Some(value) = get("APP_HOST") {
            config.host = value;
        }
        if let Some(value) = get("APP_PORT") {
            config.port = value.parse().map_err(|_| ConfigError::InvalidPort {
                key: "APP_PORT",
                value: value.clone(),
            })?;
        }
        if let Some(value) = get("TODO_STORAGE") {
            config.storage = match value.to_ascii_lowercase().as_str() {
                "docstore" => StorageBackend::DocumentStore,
                "memory" => StorageBackend::Memory,
                _ => {
                    return Err(ConfigError::InvalidStorage {
                        key: "TODO_STORAGE",
                        value,
                    })
                }
            };
        }
        if let Some(value) = get("DOCSTORE_URL") {
            config.docstore_url = value;
        }
        if let Some(value) = get("DOCSTORE_DATABASE") {
            config.docstore_database = value;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).unwrap(), Config::default());
        assert_eq!(Config::default().bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("APP_ENV", "production"),
            ("APP_HOST", "0.0.0.0"),
            ("APP_PORT", "9000"),
            ("TODO_STORAGE", "Memory"),
            ("DOCSTORE_URL", "http://store:8081"),
            ("DOCSTORE_DATABASE", "prod"),
        ])
        .unwrap();

        assert_eq!(config.app_env, "production");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.docstore_url, "http://store:8081");
        assert_eq!(config.docstore_database, "prod");
    }

    #[test]
    fn empty_values_are_ignored() {
        assert_eq!(config(&[("APP_PORT", "")]).unwrap().port, 8000);
    }

    #[test]
    fn bad_port_is_rejected() {
        assert_eq!(
            config(&[("APP_PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidPort {
                key: "APP_PORT",
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn unknown_storage_is_rejected() {
        let err = config(&[("TODO_STORAGE", "postgres")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStorage { .. }));
    }
}
