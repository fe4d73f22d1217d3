//! Cache-aside decorator for any [`UserPostsSource`].
//!
//! Lookups consult the cache first and only reach the wrapped source on a
//! miss. A successful fetch is written back exactly once; failures are never
//! cached.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{Cache, CacheKeyPrefixes, UpstreamError, UserPostsSource};
use crate::domain::{Post, UserProfile};

/// Value stored by [`CachedUserPostsSource`].
///
/// The variant records which lookup produced the value so a key holding the
/// wrong kind reads as a miss.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedUpstreamValue {
    /// Cached result of `fetch_user_info`.
    UserInfo(UserProfile),
    /// Cached result of `fetch_user_posts`.
    UserPosts(Vec<Post>),
}

/// Source decorator applying cache-aside reads and writes.
///
/// # Examples
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use gateway::domain::CachedUserPostsSource;
/// # use gateway::domain::ports::{CacheKeyPrefixes, NoOpCache, UserPostsSource};
/// # async fn example(direct: Arc<impl UserPostsSource>) -> Result<(), gateway::domain::ports::UpstreamError> {
/// let source = CachedUserPostsSource::new(direct, Arc::new(NoOpCache), CacheKeyPrefixes::default());
/// let _profile = source.fetch_user_info("1").await?;
/// # Ok(())
/// # }
/// ```
pub struct CachedUserPostsSource<S> {
    inner: Arc<S>,
    cache: Arc<dyn Cache<CachedUpstreamValue>>,
    prefixes: CacheKeyPrefixes,
}

impl<S> CachedUserPostsSource<S> {
    /// Wrap `inner` with `cache`, namespacing keys with `prefixes`.
    pub fn new(
        inner: Arc<S>,
        cache: Arc<dyn Cache<CachedUpstreamValue>>,
        prefixes: CacheKeyPrefixes,
    ) -> Self {
        Self {
            inner,
            cache,
            prefixes,
        }
    }
}

#[async_trait]
impl<S> UserPostsSource for CachedUserPostsSource<S>
where
    S: UserPostsSource,
{
    async fn fetch_user_info(&self, user_id: &str) -> Result<UserProfile, UpstreamError> {
        let key = self.prefixes.user_info_key(user_id);
        if let Some(CachedUpstreamValue::UserInfo(profile)) = self.cache.get(&key) {
            debug!(%key, "user info cache hit");
            return Ok(profile);
        }

        let profile = self.inner.fetch_user_info(user_id).await?;
        self.cache
            .set(key, CachedUpstreamValue::UserInfo(profile.clone()));
        Ok(profile)
    }

    async fn fetch_user_posts(&self, user_id: &str) -> Result<Vec<Post>, UpstreamError> {
        let key = self.prefixes.user_posts_key(user_id);
        if let Some(CachedUpstreamValue::UserPosts(posts)) = self.cache.get(&key) {
            debug!(%key, "user posts cache hit");
            return Ok(posts);
        }

        let posts = self.inner.fetch_user_posts(user_id).await?;
        self.cache
            .set(key, CachedUpstreamValue::UserPosts(posts.clone()));
        Ok(posts)
    }
}
