//! Reqwest-backed upstream source adapter.
//!
//! This adapter owns transport details only: URL construction, status
//! classification into [`ClientError`], and JSON decoding into domain
//! records. It never caches; wrap it in `CachedUserPostsSource` for that.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{PostDto, UserDto};
use crate::domain::ports::{UpstreamError, UserPostsSource};
use crate::domain::{ClientError, Post, UserProfile};

const DEFAULT_USER_AGENT: &str = concat!("user-posts-gateway/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building [`HttpUserPostsSource`].
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceBuildError {
    /// The base URL cannot have path segments appended.
    #[error("upstream base URL cannot carry a path: {url}")]
    InvalidBaseUrl { url: String },
    /// The reqwest client could not be constructed.
    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Upstream source issuing plain HTTP GETs against one base URL.
///
/// No request timeout is configured; a lookup lasts as long as the caller
/// keeps polling its future.
pub struct HttpUserPostsSource {
    client: Client,
    base_url: Url,
}

impl HttpUserPostsSource {
    /// Build an adapter targeting `base_url`.
    /// ```rust,no_run
    /// use gateway::outbound::upstream::HttpUserPostsSource;
    ///
    /// let base = "https://jsonplaceholder.typicode.com".parse()?;
    /// let source = HttpUserPostsSource::new(base)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    /// # Errors
    ///
    /// Returns an error when the URL cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, HttpSourceBuildError> {
        let client = Client::builder().user_agent(DEFAULT_USER_AGENT).build()?;
        Self::with_client(client, base_url)
    }

    /// Build an adapter around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL cannot carry a path.
    pub fn with_client(client: Client, base_url: Url) -> Result<Self, HttpSourceBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(HttpSourceBuildError::InvalidBaseUrl {
                url: base_url.to_string(),
            });
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn user_url(&self, user_id: &str) -> Url {
        self.endpoint(&["users", user_id])
    }

    fn posts_url(&self, user_id: &str) -> Url {
        let mut url = self.endpoint(&["posts"]);
        url.query_pairs_mut().append_pair("userId", user_id);
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!(%url, "calling upstream");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        check_response(status.as_u16(), body.as_ref(), url.as_str())?;

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            UpstreamError::decode(format!("invalid upstream JSON from {url}: {error}"))
        })
    }
}

#[async_trait]
impl UserPostsSource for HttpUserPostsSource {
    async fn fetch_user_info(&self, user_id: &str) -> Result<UserProfile, UpstreamError> {
        let user: Option<UserDto> = self.get_json(self.user_url(user_id)).await?;
        Ok(user.unwrap_or_default().into())
    }

    async fn fetch_user_posts(&self, user_id: &str) -> Result<Vec<Post>, UpstreamError> {
        // A `null` reply means no posts.
        let posts: Option<Vec<PostDto>> = self.get_json(self.posts_url(user_id)).await?;
        Ok(posts
            .unwrap_or_default()
            .into_iter()
            .map(Post::from)
            .collect())
    }
}

/// Classify an upstream reply, turning non-2xx statuses into a client error.
fn check_response(status: u16, body: &[u8], url: &str) -> Result<(), UpstreamError> {
    ClientError::classify(status, body, url).map_err(UpstreamError::client)
}

fn map_transport_error(error: reqwest::Error) -> UpstreamError {
    UpstreamError::transport(error.to_string())
}
