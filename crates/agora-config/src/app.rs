use crate::error::ConfigError;
use crate::flags::Cli;
use crate::jwt::JwtConfig;
use crate::layer::ConfigLayer;

/// Placeholder signing secret. Outside debug mode it is replaced at startup.
pub const DEFAULT_SECRET: &str = "default-secret";

const TOKEN_ISSUER: &str = "agora";

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub secret: String,
    pub database_url: String,
    pub migration_source: String,
    /// Empty disables OTLP export.
    pub otel_collector_url: String,
    /// Token lifetime in seconds.
    pub token_ttl: i64,
    pub password_cost: u32,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            host: "localhost".to_string(),
            port: 8080,
            secret: DEFAULT_SECRET.to_string(),
            database_url: String::new(),
            migration_source: "migrations".to_string(),
            otel_collector_url: String::new(),
            token_ttl: 24 * 60 * 60, // 24 hours
            password_cost: bcrypt_default_cost(),
            log_dir: None,
        }
    }
}

// bcrypt::DEFAULT_COST, kept local so this crate does not pull in bcrypt
const fn bcrypt_default_cost() -> u32 {
    12
}

impl AppConfig {
    /// Applies one layer on top of `self`. Fields the layer leaves unset keep their value.
    pub fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            debug: layer.debug.unwrap_or(self.debug),
            host: layer.host.unwrap_or(self.host),
            port: layer.port.unwrap_or(self.port),
            secret: layer.secret.unwrap_or(self.secret),
            database_url: layer.database_url.unwrap_or(self.database_url),
            migration_source: layer.migration_source.unwrap_or(self.migration_source),
            otel_collector_url: layer.otel_collector_url.unwrap_or(self.otel_collector_url),
            token_ttl: layer.token_ttl.unwrap_or(self.token_ttl),
            password_cost: layer.password_cost.unwrap_or(self.password_cost),
            log_dir: layer.log_dir.or(self.log_dir),
        }
    }

    /// Defaults, then file, then environment, then flags.
    pub fn resolve(file: Option<ConfigLayer>, env: ConfigLayer, flags: ConfigLayer) -> Self {
        let mut config = Self::default();
        if let Some(file) = file {
            config = config.merge(file);
        }
        config.merge(env).merge(flags)
    }

    /// Loads every layer for a running process. A missing config file is skipped.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = ConfigLayer::from_file(&cli.config)?;
        dotenvy::dotenv().ok();
        let env = ConfigLayer::from_env()?;

        Ok(Self::resolve(file, env, cli.layer()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::DatabaseUrlRequired);
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                field: "port",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.token_ttl <= 0 {
            return Err(ConfigError::Invalid {
                field: "token_ttl",
                reason: format!("must be a positive number of seconds, got {}", self.token_ttl),
            });
        }
        if !(4..=31).contains(&self.password_cost) {
            return Err(ConfigError::Invalid {
                field: "password_cost",
                reason: format!("must be between 4 and 31, got {}", self.password_cost),
            });
        }
        Ok(())
    }

    /// Replaces the placeholder secret with a random one when not in debug mode.
    /// Returns true when the secret was replaced, tokens then do not survive a restart.
    pub fn harden_secret(&mut self) -> bool {
        if self.secret == DEFAULT_SECRET && !self.debug {
            self.secret = uuid::Uuid::new_v4().to_string();
            return true;
        }
        false
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            secret: self.secret.clone(),
            token_ttl: self.token_ttl,
            issuer: TOKEN_ISSUER.to_string(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("debug", &self.debug)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"<redacted>")
            .field("database_url", &"<redacted>")
            .field("migration_source", &self.migration_source)
            .field("otel_collector_url", &self.otel_collector_url)
            .field("token_ttl", &self.token_ttl)
            .field("password_cost", &self.password_cost)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}
