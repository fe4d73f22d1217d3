//! User posts API handler.
//!
//! ```text
//! GET /v1/user-posts/{id}
//! ```

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::domain::ClientError;
use crate::inbound::http::error::{ApiError, ApiResult, HandlerError, InternalErrorBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::user_posts_dto::{CombinedUserResponse, to_combined_response};

/// Fetch a user profile and that user's posts as one response.
///
/// The profile is fetched first; a failure there is reported without
/// touching the posts endpoint. Any failure fails the whole request.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use gateway::inbound::http::user_posts::get_user_posts;
///
/// let app = App::new().service(web::scope("/v1").service(get_user_posts));
/// ```
#[utoipa::path(
    get,
    path = "/v1/user-posts/{id}",
    params(("id" = String, Path, description = "Upstream user identifier")),
    responses(
        (status = 200, description = "Profile and posts", body = CombinedUserResponse),
        (status = 404, description = "Upstream reported the user missing", body = ClientError),
        (status = 502, description = "Upstream server error passed through", body = ClientError),
        (status = 500, description = "Internal failure", body = InternalErrorBody)
    ),
    tags = ["user-posts"],
    operation_id = "getUserPosts"
)]
#[get("/user-posts/{id}")]
pub async fn get_user_posts(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    let request_url = request.uri().to_string();
    let fail = |error: HandlerError| ApiError::new(error, request_url.as_str());

    let profile = state
        .user_posts
        .fetch_user_info(&user_id)
        .await
        .map_err(|error| fail(error.into()))?;
    let posts = state
        .user_posts
        .fetch_user_posts(&user_id)
        .await
        .map_err(|error| fail(error.into()))?;

    let body = serde_json::to_vec(&to_combined_response(&profile, &posts))
        .map_err(|error| fail(error.into()))?;
    Ok(HttpResponse::build(StatusCode::OK)
        .content_type(ContentType::json())
        .body(body))
}
