//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers the combined user/posts
//! endpoint together with its success body and both error bodies.
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::ClientError;
use crate::inbound::http::error::InternalErrorBody;
use crate::inbound::http::user_posts_dto::{CombinedUserResponse, PostSummary, UserInfoSummary};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User posts gateway API",
        description = "Combines an upstream user profile and that user's posts in one response."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(crate::inbound::http::user_posts::get_user_posts),
    components(schemas(
        CombinedUserResponse,
        UserInfoSummary,
        PostSummary,
        ClientError,
        InternalErrorBody
    )),
    tags(
        (name = "user-posts", description = "Aggregated user profile and posts")
    )
)]
pub struct ApiDoc;
