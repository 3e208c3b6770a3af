use agora_core::Problem;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::modules::comments::model::{Comment, CreateCommentRequest};
use crate::modules::posts::model::{CreatePostRequest, Post};
use crate::modules::users::model::UserProfile;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_current_user,
        crate::modules::posts::controller::list_posts,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::get_post,
        crate::modules::comments::controller::list_comments,
        crate::modules::comments::controller::list_post_comments,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::get_comment,
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserProfile,
            Post,
            CreatePostRequest,
            Comment,
            CreateCommentRequest,
            Problem,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "The authenticated user"),
        (name = "Posts", description = "Forum posts"),
        (name = "Comments", description = "Comments on posts")
    ),
    info(
        title = "Agora API",
        version = "0.1.0",
        description = "Forum backend with posts, comments and token based authentication. Errors are RFC 7807 problem documents.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
