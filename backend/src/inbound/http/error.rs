//! HTTP adapter mapping for upstream and handler errors.
//!
//! Purpose: turn the two-tier upstream error taxonomy into responses.
//! A classified [`ClientError`] passes through with its own status and JSON
//! body. Every other failure becomes a 500 with an [`InternalErrorBody`].

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ClientError;
use crate::domain::ports::UpstreamError;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures raised while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// An upstream lookup failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    /// The success body could not be encoded.
    #[error("failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Upstream(error) => error.as_client_error(),
            Self::Serialization(_) => None,
        }
    }
}

/// Body returned for failures that are not classified upstream responses.
///
/// Example JSON:
/// `{"statusCode":500,"requestUrl":"/v1/user-posts/1","msg":"upstream transport failed: ..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternalErrorBody {
    #[schema(example = 500)]
    pub status_code: u16,
    #[schema(example = "/v1/user-posts/1")]
    pub request_url: String,
    pub msg: String,
}

impl InternalErrorBody {
    /// Build a 500 body for `request_url`.
    pub fn new(request_url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            request_url: request_url.into(),
            msg: msg.into(),
        }
    }
}

/// Handler error bound to the inbound request URL.
#[derive(Debug)]
pub struct ApiError {
    error: HandlerError,
    request_url: String,
}

impl ApiError {
    /// Bind `error` to the URL of the request that failed.
    pub fn new(error: impl Into<HandlerError>, request_url: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            request_url: request_url.into(),
        }
    }

    /// The underlying handler error.
    pub fn error(&self) -> &HandlerError {
        &self.error
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

fn client_status(client: &ClientError) -> StatusCode {
    StatusCode::from_u16(client.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.error.as_client_error() {
            Some(client) => client_status(client),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_response(&self.error, &self.request_url)
    }
}

/// Translate a handler failure into the response sent to the caller.
///
/// Upstream 5xx and generic failures are logged at error level; upstream 4xx
/// is expected and not logged here.
pub fn error_response(error: &HandlerError, request_url: &str) -> HttpResponse {
    match error.as_client_error() {
        Some(client) => {
            if client.is_server_error() {
                error!(
                    status = client.status_code,
                    url = %client.url,
                    "client API returned a server error"
                );
            }
            json_response(client_status(client), client)
        }
        None => {
            error!(error = %error, url = request_url, "request failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &InternalErrorBody::new(request_url, error.to_string()),
            )
        }
    }
}

/// Encode `body` as JSON with `status`.
///
/// Falls back to a plain-text 500 when encoding fails.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => HttpResponse::build(status)
            .content_type(ContentType::json())
            .body(bytes),
        Err(encode_error) => {
            error!(error = %encode_error, "failed to encode error response");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body(StatusCode::INTERNAL_SERVER_ERROR.canonical_reason().unwrap_or_default())
        }
    }
}
