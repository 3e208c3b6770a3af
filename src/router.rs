use agora_core::AppError;
use anyhow::anyhow;
use axum::http::Uri;
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::auth::authenticate;
use crate::middleware::recover::handle_panic;
use crate::middleware::role::require_user;
use crate::modules::auth::router::init_auth_router;
use crate::modules::comments::router::init_comments_router;
use crate::modules::posts::router::init_posts_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(anyhow!("No route for {}", uri.path()))
}

pub fn init_router(state: AppState) -> Router {
    // route layers run bottom-up: authenticate, then the role check
    let protected = Router::new()
        .merge(init_users_router())
        .merge(init_posts_router())
        .merge(init_comments_router())
        .route_layer(middleware::from_fn(require_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", Router::new().merge(init_auth_router()).merge(protected))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
}
