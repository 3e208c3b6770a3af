//! Application error type rendered as RFC 7807 problem responses.
//!
//! Every fallible handler returns [`AppError`]. The status code decides the
//! problem title; server-side errors never leak their cause to the client,
//! the full error chain is only written to the log.

use anyhow::Error;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Media type of every error body.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

const INTERNAL_DETAIL: &str = "Internal server error";

/// A problem detail object (RFC 7807).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    pub title: String,
    pub status: u16,
    /// URI identifying the problem type. Points at the MDN page of the status code.
    #[serde(rename = "type")]
    pub problem_type: String,
    pub detail: String,
}

impl Problem {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            title: problem_title(status).to_string(),
            status: status.as_u16(),
            problem_type: format!(
                "https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/{}",
                status.as_u16()
            ),
            detail: detail.into(),
        }
    }
}

fn problem_title(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Validation Problem",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::CONFLICT => "Conflict",
        other => other.canonical_reason().unwrap_or("Internal Server Error"),
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    /// The problem object sent to the client.
    pub fn problem(&self) -> Problem {
        let detail = if self.status.is_server_error() {
            INTERNAL_DETAIL.to_string()
        } else {
            self.error.to_string()
        };

        Problem::new(self.status, detail)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:#}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let problem = self.problem();

        if self.status.is_server_error() {
            error!(
                problem = %problem.title,
                status = problem.status,
                error = %format!("{:#}", self.error),
                "Handling {}",
                problem.title
            );
        } else {
            warn!(
                problem = %problem.title,
                status = problem.status,
                error = %format!("{:#}", self.error),
                "Handling {}",
                problem.title
            );
        }

        let mut response = (self.status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Parses a path or body identifier, rejecting anything that is not a UUID.
pub fn parse_uuid(value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value)
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("'{}' is not a valid identifier", value)))
}
