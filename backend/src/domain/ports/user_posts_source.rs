//! Driven port for reading user profiles and posts from the upstream API.
//!
//! The domain owns the record shapes and the error taxonomy so the direct
//! HTTP adapter and the cache-aside decorator stay interchangeable.

use async_trait::async_trait;

use crate::domain::{ClientError, Post, UserProfile};

/// Errors surfaced while calling the upstream API.
///
/// `Client` is an interpretable upstream failure and keeps its status code.
/// Every other variant is a generic failure the gateway reports as a 500.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("{error}")]
    Client { error: ClientError },
    /// Network transport failed before a complete response arrived.
    #[error("upstream transport failed: {message}")]
    Transport { message: String },
    /// A successful response could not be decoded.
    #[error("upstream response decode failed: {message}")]
    Decode { message: String },
}

impl UpstreamError {
    /// Wrap a classified upstream response.
    pub fn client(error: ClientError) -> Self {
        Self::Client { error }
    }

    /// Build a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a decode failure.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Borrow the classified upstream response, if this is one.
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client { error } => Some(error),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

impl From<ClientError> for UpstreamError {
    fn from(error: ClientError) -> Self {
        Self::client(error)
    }
}

/// Port for fetching the records the gateway combines.
///
/// Dropping a returned future abandons the in-flight upstream request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserPostsSource: Send + Sync {
    /// Fetch the profile of `user_id`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use gateway::domain::ports::UserPostsSource;
    ///
    /// let profile = source.fetch_user_info("1").await?;
    /// assert_eq!(profile.id, 1);
    /// # Ok::<(), gateway::domain::ports::UpstreamError>(())
    /// ```
    async fn fetch_user_info(&self, user_id: &str) -> Result<UserProfile, UpstreamError>;

    /// Fetch the posts of `user_id` in upstream order.
    async fn fetch_user_posts(&self, user_id: &str) -> Result<Vec<Post>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_display_like_the_wrapped_error() {
        let inner = ClientError::empty_response(404, "https://api.example/users/1");
        let err = UpstreamError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.as_client_error(), Some(&inner));
    }

    #[test]
    fn generic_errors_are_not_client_errors() {
        assert!(UpstreamError::transport("connection refused").as_client_error().is_none());
        assert_eq!(
            UpstreamError::decode("expected value").to_string(),
            "upstream response decode failed: expected value"
        );
    }
}
