//! # Agora API
//!
//! A forum backend built with Axum and PostgreSQL: users register and log in,
//! then read and write posts and comments with a signed session token.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── agora-core/      # AppError, RFC 7807 problems, password hashing
//! ├── agora-config/    # defaults < YAML < env (.env) < CLI flags
//! ├── agora-db/        # pool, migrations, StoreError
//! └── agora-auth/      # TokenService (HS256 JWT)
//! src/
//! ├── middleware/      # authenticate, require_roles, panic recovery
//! ├── modules/         # auth, users, posts, comments
//! ├── logging.rs       # tracing subscriber, OTLP export, request logging
//! ├── docs.rs          # OpenAPI document
//! └── router.rs        # route table and middleware stack
//! ```
//!
//! Each feature module has the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: the persistence trait, its PostgreSQL implementation and
//!   any logic that sits between handler and store
//! - `model.rs`: rows, request bodies and views
//! - `router.rs`: the module's routes
//!
//! ## Errors
//!
//! Every failure reaches the client as an RFC 7807 problem document with
//! `Content-Type: application/problem+json`. Server-side errors only say
//! "Internal server error"; the cause is logged.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:8080/swagger-ui`
//! - Scalar: `http://localhost:8080/scalar`

pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod validator;

// Re-export workspace crates for convenience
pub use agora_auth;
pub use agora_config;
pub use agora_core;
pub use agora_db;
