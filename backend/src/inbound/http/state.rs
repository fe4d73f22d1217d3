//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserPostsSource;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Source of user profiles and posts, usually cache-decorated.
    pub user_posts: Arc<dyn UserPostsSource>,
}

impl HttpState {
    /// Construct state from a user/posts source.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use gateway::inbound::http::state::HttpState;
    /// use gateway::outbound::upstream::HttpUserPostsSource;
    ///
    /// let source = HttpUserPostsSource::new("https://api.example".parse()?)?;
    /// let state = HttpState::new(Arc::new(source));
    /// let _source = state.user_posts.clone();
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(user_posts: Arc<dyn UserPostsSource>) -> Self {
        Self { user_posts }
    }
}
