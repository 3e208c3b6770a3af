use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_norway::Error,
    },

    #[error("invalid value {value:?} for environment variable {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("database URL is required")]
    DatabaseUrlRequired,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// What the operator should change to get past this error.
    pub fn remedy(&self) -> String {
        match self {
            Self::Io { path, .. } => format!(
                "Make sure {} is readable, or point --config at another file.",
                path.display()
            ),
            Self::Yaml { path, .. } => format!(
                "Fix the YAML syntax in {}. Keys must match the documented configuration fields.",
                path.display()
            ),
            Self::InvalidEnv { key, .. } => {
                format!("Set {} to a valid value or unset it to use the default.", key)
            }
            Self::DatabaseUrlRequired => "Set database_url in the config file, the DATABASE_URL \
                 environment variable or the --database-url flag."
                .to_string(),
            Self::Invalid { field, .. } => {
                format!("Correct the value of {} in one of the configuration sources.", field)
            }
        }
    }
}

/// The message printed when the application cannot start.
pub fn failure_banner(what: &str, remedy: &str) -> String {
    format!(
        "\n\nApplication Failed to Start\n-----------------------------------------\n\n\
         # What's wrong?\n{}\n\n# How to fix it?\n{}\n",
        what, remedy
    )
}
