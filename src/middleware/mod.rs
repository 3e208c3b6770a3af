//! Request middleware.
//!
//! Protected routes run, from the outside in:
//!
//! 1. [`crate::logging::logging_middleware`]: request span and access log
//! 2. [`recover::handle_panic`]: turns a handler panic into a 500 problem
//! 3. [`auth::authenticate`]: verifies the `Authorization` header and stores
//!    the caller's [`AuthUser`](auth::AuthUser) in the request extensions
//! 4. [`role::require_roles`]: admits the request only for the listed roles
//!
//! # Example
//!
//! ```ignore
//! use axum::middleware;
//! use crate::middleware::{auth::authenticate, role::require_user};
//!
//! let protected = init_posts_router()
//!     .route_layer(middleware::from_fn(require_user))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod recover;
pub mod role;
