use agora_core::AppError;
use thiserror::Error;
use tracing::warn;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to find {table} with {key}={value}")]
    NotFound {
        table: &'static str,
        key: &'static str,
        value: String,
    },

    #[error("duplicate key value in {table}: {detail}")]
    DuplicateKey { table: &'static str, detail: String },

    #[error("foreign key violation in {table}: {detail}")]
    ForeignKeyViolation { table: &'static str, detail: String },

    #[error("deadlock detected")]
    Deadlock(#[source] sqlx::Error),

    #[error("query timed out")]
    Timeout,

    #[error("internal database error: {0}")]
    Internal(#[source] sqlx::Error),
}

impl StoreError {
    pub fn not_found(table: &'static str, key: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            table,
            key,
            value: value.to_string(),
        }
    }

    /// Translates a driver error raised while touching `table`.
    pub fn from_sqlx(table: &'static str, err: sqlx::Error) -> Self {
        Self::classify(table, None, err)
    }

    /// Like [`StoreError::from_sqlx`], but a missing row reports the looked-up key.
    pub fn from_sqlx_with_key(
        table: &'static str,
        key: &'static str,
        value: impl ToString,
        err: sqlx::Error,
    ) -> Self {
        Self::classify(table, Some((key, value.to_string())), err)
    }

    fn classify(table: &'static str, lookup: Option<(&'static str, String)>, err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            let (key, value) = lookup.unwrap_or(("row", String::new()));
            return Self::NotFound { table, key, value };
        }

        if let sqlx::Error::PoolTimedOut = err {
            warn!(table, "Timed out waiting for a database connection");
            return Self::Timeout;
        }

        let code = err
            .as_database_error()
            .and_then(|db| db.code().map(|code| code.into_owned()));

        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => Self::DuplicateKey {
                table,
                detail: err.to_string(),
            },
            Some(FOREIGN_KEY_VIOLATION) => Self::ForeignKeyViolation {
                table,
                detail: err.to_string(),
            },
            Some(DEADLOCK_DETECTED) => {
                warn!(table, "Deadlock detected");
                Self::Deadlock(err)
            }
            _ => Self::Internal(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::not_found(err),
            StoreError::DuplicateKey { .. } => AppError::conflict(err),
            _ => AppError::database(err),
        }
    }
}
