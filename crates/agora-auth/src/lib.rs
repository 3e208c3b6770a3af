//! # Agora Auth
//!
//! Session tokens for the Agora API.
//!
//! - [`claims`]: the signed claim set and the [`Identity`] recovered from it
//! - [`jwt`]: [`TokenService`], which issues and verifies HS256 tokens
//!
//! The signing secret comes from an explicitly constructed
//! [`JwtConfig`](agora_config::JwtConfig); there is no process-wide key.
//!
//! # Example
//!
//! ```ignore
//! use agora_auth::TokenService;
//!
//! let tokens = TokenService::new(&config.jwt());
//! let token = tokens.issue(user_id, "alice", "USER")?;
//! let identity = tokens.verify(&format!("Bearer {token}"))?;
//! assert_eq!(identity.role, "USER");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, Identity};
pub use jwt::{TokenError, TokenService, UNAUTHENTICATED_DETAIL};
