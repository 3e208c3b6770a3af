//! Claim set carried by session tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered and private claims of a session token.
///
/// Timestamps are Unix seconds. `jti` is a fresh UUIDv4 per token, so two
/// tokens issued in the same second for the same user still differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iss: String,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// The caller, as proven by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}
