//! # Agora Core
//!
//! Core types and utilities shared by every Agora crate.
//!
//! - [`errors`]: the application error type and its RFC 7807 problem rendering
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use agora_core::errors::AppError;
//! use agora_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("unable to find posts with id=42"));
//! let hash = hash_password("secret1", bcrypt::DEFAULT_COST)?;
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, Problem, parse_uuid};
pub use password::{hash_password, verify_password};
