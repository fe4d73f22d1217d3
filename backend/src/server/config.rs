//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use gateway::domain::ports::UserPostsSource;

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) user_posts: Arc<dyn UserPostsSource>,
}

impl ServerConfig {
    /// Construct a server configuration serving `user_posts` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, user_posts: Arc<dyn UserPostsSource>) -> Self {
        Self {
            bind_addr,
            user_posts,
        }
    }
}
