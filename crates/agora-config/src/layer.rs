//! A single configuration source.
//!
//! Every field is optional: `None` means "this source does not set the value".
//! Empty strings coming from the environment are treated as unset.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_DEBUG: &str = "DEBUG";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SECRET: &str = "SECRET";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_MIGRATION_SOURCE: &str = "MIGRATION_SOURCE";
pub const ENV_OTEL_COLLECTOR_URL: &str = "OTEL_COLLECTOR_URL";
pub const ENV_TOKEN_TTL: &str = "TOKEN_TTL";
pub const ENV_PASSWORD_COST: &str = "PASSWORD_COST";
pub const ENV_LOG_DIR: &str = "LOG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub debug: Option<bool>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub secret: Option<String>,
    pub database_url: Option<String>,
    pub migration_source: Option<String>,
    pub otel_collector_url: Option<String>,
    /// Token lifetime in seconds.
    pub token_ttl: Option<i64>,
    pub password_cost: Option<u32>,
    pub log_dir: Option<String>,
}

impl ConfigLayer {
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_norway::Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_norway::from_str(source)
    }

    /// Reads a YAML file. A missing file is not an error and yields `None`.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_yaml_str(&contents)
            .map(Some)
            .map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a layer from any key lookup, so the environment can be substituted in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            debug: get(ENV_DEBUG)
                .map(|value| parse_bool(ENV_DEBUG, value))
                .transpose()?,
            host: get(ENV_HOST),
            port: get(ENV_PORT)
                .map(|value| parse_number(ENV_PORT, value))
                .transpose()?,
            secret: get(ENV_SECRET),
            database_url: get(ENV_DATABASE_URL),
            migration_source: get(ENV_MIGRATION_SOURCE),
            otel_collector_url: get(ENV_OTEL_COLLECTOR_URL),
            token_ttl: get(ENV_TOKEN_TTL)
                .map(|value| parse_number(ENV_TOKEN_TTL, value))
                .transpose()?,
            password_cost: get(ENV_PASSWORD_COST)
                .map(|value| parse_number(ENV_PASSWORD_COST, value))
                .transpose()?,
            log_dir: get(ENV_LOG_DIR),
        })
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidEnv { key, value }),
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_yaml_layer() {
        let layer = ConfigLayer::from_yaml_str(
            "debug: true\nhost: 0.0.0.0\nport: 9000\ndatabase_url: postgres://localhost/agora\n",
        )
        .unwrap();

        assert_eq!(layer.debug, Some(true));
        assert_eq!(layer.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(layer.port, Some(9000));
        assert_eq!(layer.database_url.as_deref(), Some("postgres://localhost/agora"));
        assert_eq!(layer.secret, None);
    }

    #[test]
    fn test_empty_yaml_is_empty_layer() {
        assert_eq!(ConfigLayer::from_yaml_str("  \n").unwrap(), ConfigLayer::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(ConfigLayer::from_yaml_str("port: [not, a, number]").is_err());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let layer = ConfigLayer::from_file(&dir.path().join("config.yaml")).unwrap();
        assert!(layer.is_none());
    }

    #[test]
    fn test_file_layer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 8181\nsecret: from-file").unwrap();

        let layer = ConfigLayer::from_file(file.path()).unwrap().unwrap();
        assert_eq!(layer.port, Some(8181));
        assert_eq!(layer.secret.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_unparsable_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: eighty").unwrap();

        let err = ConfigLayer::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_env_layer() {
        let layer = ConfigLayer::from_lookup(lookup_from(&[
            ("DEBUG", "true"),
            ("PORT", "9100"),
            ("SECRET", "from-env"),
            ("TOKEN_TTL", "600"),
        ]))
        .unwrap();

        assert_eq!(layer.debug, Some(true));
        assert_eq!(layer.port, Some(9100));
        assert_eq!(layer.secret.as_deref(), Some("from-env"));
        assert_eq!(layer.token_ttl, Some(600));
        assert_eq!(layer.host, None);
    }

    #[test]
    fn test_env_empty_values_are_unset() {
        let layer = ConfigLayer::from_lookup(lookup_from(&[("HOST", ""), ("PORT", "  ")])).unwrap();
        assert_eq!(layer, ConfigLayer::default());
    }

    #[test]
    fn test_env_invalid_number() {
        let err = ConfigLayer::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn test_env_invalid_bool() {
        let err = ConfigLayer::from_lookup(lookup_from(&[("DEBUG", "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "DEBUG", .. }));
    }
}
