//! Issuing and verifying session tokens.
//!
//! Tokens are HS256 JWTs. Verification accepts an optional `Bearer ` prefix
//! and applies no clock leeway: a token is rejected the second after `exp`
//! and until the second of `nbf`.

use agora_config::JwtConfig;
use agora_core::AppError;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::claims::{Claims, Identity};

const BEARER_PREFIX: &str = "Bearer ";

/// The only detail a client sees for a rejected token. The cause goes to the log.
pub const UNAUTHENTICATED_DETAIL: &str = "You must be logged in to access this resource";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired { expired_at: Option<DateTime<Utc>> },

    #[error("token is not valid yet")]
    NotYetValid { not_before: Option<DateTime<Utc>> },

    #[error("failed to parse token: {0}")]
    ParseFailed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::internal(err),
            _ => AppError::unauthorized(anyhow::Error::new(err).context(UNAUTHENTICATED_DETAIL)),
        }
    }
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            ttl: config.token_ttl,
        }
    }

    /// Signs a new token for the given user.
    pub fn issue(&self, id: Uuid, username: &str, role: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            nbf: now,
            exp: now + self.ttl,
        };

        match encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key) {
            Ok(token) => {
                debug!(user_id = %id, username, role, "Issued token");
                Ok(token)
            }
            Err(e) => {
                error!(user_id = %id, username, role, error = %e, "Failed to sign token");
                Err(TokenError::Signing(e.to_string()))
            }
        }
    }

    /// Verifies a token, with or without the `Bearer ` prefix, and returns the caller's identity.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();

        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => return Err(self.classify(token, e)),
        };

        let id = Uuid::parse_str(&claims.sub).map_err(|e| {
            debug!(subject = %claims.sub, error = %e, "Token subject is not a user id");
            TokenError::ParseFailed(format!("subject is not a valid id: {}", e))
        })?;

        debug!(user_id = %id, username = %claims.username, role = %claims.role, "Verified token");

        Ok(Identity {
            id,
            username: claims.username,
            role: claims.role,
        })
    }

    fn classify(&self, token: &str, err: jsonwebtoken::errors::Error) -> TokenError {
        match err.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => {
                debug!(error = %err, "Rejected token with malformed structure");
                TokenError::Malformed
            }
            ErrorKind::InvalidSignature => {
                debug!(error = %err, "Rejected token with invalid signature");
                TokenError::SignatureInvalid
            }
            ErrorKind::ExpiredSignature => {
                let expired_at = self.peek(token).and_then(|c| DateTime::from_timestamp(c.exp, 0));
                debug!(error = %err, expired_at = ?expired_at, "Rejected expired token");
                TokenError::Expired { expired_at }
            }
            ErrorKind::ImmatureSignature => {
                let not_before = self.peek(token).and_then(|c| DateTime::from_timestamp(c.nbf, 0));
                debug!(error = %err, not_before = ?not_before, "Rejected token that is not valid yet");
                TokenError::NotYetValid { not_before }
            }
            _ => {
                debug!(error = %err, "Failed to parse or validate token");
                TokenError::ParseFailed(err.to_string())
            }
        }
    }

    /// Reads claims of a token whose signature already checked out, ignoring time bounds.
    fn peek(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .ok()
            .map(|data| data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
