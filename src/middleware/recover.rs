use std::any::Any;

use agora_core::AppError;
use anyhow::anyhow;
use axum::response::{IntoResponse, Response};

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer`.
///
/// The panic message goes to the log only; the client gets a generic 500 problem.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(anyhow!("recovered from panic: {}", message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("store exploded"));
        assert_eq!(response.status().as_u16(), 500);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            agora_core::errors::PROBLEM_CONTENT_TYPE
        );
    }

    #[test]
    fn test_string_payload() {
        let response = handle_panic(Box::new(String::from("boom")));
        assert_eq!(response.status().as_u16(), 500);
    }
}
