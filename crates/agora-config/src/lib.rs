//! # Agora Config
//!
//! Configuration for the Agora API, assembled from four layers of increasing
//! precedence:
//!
//! 1. built-in defaults ([`AppConfig::default`])
//! 2. a YAML file (`config.yaml` unless `--config` says otherwise)
//! 3. environment variables, after loading a `.env` file if present
//! 4. command line flags ([`Cli`])
//!
//! Each layer is a [`ConfigLayer`] whose unset fields leave the value below
//! untouched. [`AppConfig::merge`] applies one layer field by field.
//!
//! # Example
//!
//! ```ignore
//! use agora_config::{AppConfig, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = AppConfig::load(&cli)?;
//! config.validate()?;
//! let jwt_config = config.jwt();
//! ```

pub mod app;
pub mod error;
pub mod flags;
pub mod jwt;
pub mod layer;

// Re-export commonly used types at crate root
pub use app::{AppConfig, DEFAULT_SECRET};
pub use error::{ConfigError, failure_banner};
pub use flags::Cli;
pub use jwt::JwtConfig;
pub use layer::ConfigLayer;
