//! Domain ports and supporting types for the hexagonal boundary.

mod cache;
mod cache_key;
mod user_posts_source;

pub use cache::{Cache, NoOpCache};
pub use cache_key::{CacheKey, CacheKeyPrefixes, USER_INFO_KEY_PREFIX, USER_POSTS_KEY_PREFIX};
#[cfg(test)]
pub use user_posts_source::MockUserPostsSource;
pub use user_posts_source::{UpstreamError, UserPostsSource};
