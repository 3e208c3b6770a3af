use std::path::PathBuf;

use clap::Parser;

use crate::layer::ConfigLayer;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Command line flags. They form the highest-precedence configuration layer.
#[derive(Debug, Clone, Parser)]
#[command(name = "agora", version, about = "Agora forum API server")]
pub struct Cli {
    /// Path of the YAML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug mode (human readable logs, default secret allowed)
    #[arg(long)]
    pub debug: bool,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Token signing secret
    #[arg(long)]
    pub secret: Option<String>,

    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory holding the SQL migrations
    #[arg(long)]
    pub migration_source: Option<String>,

    /// OTLP gRPC endpoint, tracing export is disabled when unset
    #[arg(long)]
    pub otel_collector_url: Option<String>,

    /// Token lifetime in seconds
    #[arg(long)]
    pub token_ttl: Option<i64>,

    /// bcrypt cost used when hashing new passwords
    #[arg(long)]
    pub password_cost: Option<u32>,

    /// Directory for rolling JSON log files
    #[arg(long)]
    pub log_dir: Option<String>,
}

impl Cli {
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            // a bare flag can only switch debug on
            debug: self.debug.then_some(true),
            host: self.host.clone(),
            port: self.port,
            secret: self.secret.clone(),
            database_url: self.database_url.clone(),
            migration_source: self.migration_source.clone(),
            otel_collector_url: self.otel_collector_url.clone(),
            token_ttl: self.token_ttl,
            password_cost: self.password_cost,
            log_dir: self.log_dir.clone(),
        }
    }
}
