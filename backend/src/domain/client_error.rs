//! Structured representation of a non-success upstream response.
//!
//! A `ClientError` carries enough of the upstream reply to rebuild an
//! equivalent HTTP response: the status code, either the raw body or a
//! synthetic message, and the URL that produced it. Inbound adapters pass it
//! through to callers with the same status.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message used when the upstream error body carries no information.
pub const EMPTY_RESPONSE_MESSAGE: &str = "API returned an invalid or empty response";

/// Upstream failure with a known HTTP status.
///
/// ## Invariants
/// - Exactly one of `body` and `msg` is set when built by [`ClientError::classify`].
///
/// # Examples
/// ```
/// use gateway::domain::ClientError;
///
/// let err = ClientError::classify(404, b"", "https://api.example/users/1")
///     .expect_err("404 is not a success");
/// assert_eq!(err.status_code, 404);
/// assert!(err.body.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("API response error statusCode={status_code} body={} url={url}", .body.as_deref().unwrap_or_default())]
pub struct ClientError {
    /// HTTP status returned by the upstream.
    #[schema(example = 404)]
    pub status_code: u16,
    /// Raw upstream body, when it carried content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Synthetic explanation, when the upstream body was empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "API returned an invalid or empty response")]
    pub msg: Option<String>,
    /// URL of the request that produced the response.
    pub url: String,
}

impl ClientError {
    /// Build an error for a response whose body is not worth forwarding.
    pub fn empty_response(status_code: u16, url: impl Into<String>) -> Self {
        Self {
            status_code,
            body: None,
            msg: Some(EMPTY_RESPONSE_MESSAGE.to_owned()),
            url: url.into(),
        }
    }

    /// Build an error forwarding the upstream body verbatim.
    pub fn with_body(status_code: u16, body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status_code,
            body: Some(body.into()),
            msg: None,
            url: url.into(),
        }
    }

    /// Classify an upstream status and body.
    ///
    /// Any status in `200..=299` is a success. Otherwise an empty body or the
    /// literal `{}` yields [`ClientError::empty_response`]; any other body is
    /// forwarded through [`ClientError::with_body`].
    ///
    /// # Errors
    /// Returns the classified [`ClientError`] for non-2xx statuses.
    pub fn classify(status_code: u16, body: &[u8], url: &str) -> Result<(), Self> {
        if (200..=299).contains(&status_code) {
            return Ok(());
        }
        let raw = String::from_utf8_lossy(body);
        if raw.is_empty() || raw == "{}" {
            Err(Self::empty_response(status_code, url))
        } else {
            Err(Self::with_body(status_code, raw, url))
        }
    }

    /// Whether the upstream reported a server-class failure.
    pub fn is_server_error(&self) -> bool {
        self.status_code >= 500
    }
}
