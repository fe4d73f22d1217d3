//! Cache keys and the prefix policy used to namespace upstream lookups.
//!
//! A key is the prefix and the user id joined by `-`. The id is taken as the
//! caller sent it, so `"1"` and `"1 "` name different entries, matching the
//! distinct upstream requests they produce.

use std::fmt;

/// Prefix for cached user profiles.
pub const USER_INFO_KEY_PREFIX: &str = "user";
/// Prefix for cached post listings.
pub const USER_POSTS_KEY_PREFIX: &str = "posts-user";

/// Opaque key under which one cached value is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Wrap `value` as a key.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefixes separating the user-info and user-posts key spaces.
///
/// Injected into the caching client at construction so two clients sharing
/// one cache can be kept apart.
///
/// # Examples
/// ```
/// use gateway::domain::ports::CacheKeyPrefixes;
///
/// let prefixes = CacheKeyPrefixes::default();
/// assert_eq!(prefixes.user_info_key("7").as_str(), "user-7");
/// assert_eq!(prefixes.user_posts_key("7").as_str(), "posts-user-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyPrefixes {
    /// Prefix joined with the user id for profile lookups.
    pub user_info: String,
    /// Prefix joined with the user id for post lookups.
    pub user_posts: String,
}

impl Default for CacheKeyPrefixes {
    fn default() -> Self {
        Self {
            user_info: USER_INFO_KEY_PREFIX.to_owned(),
            user_posts: USER_POSTS_KEY_PREFIX.to_owned(),
        }
    }
}

impl CacheKeyPrefixes {
    /// Key for the profile of `user_id`.
    pub fn user_info_key(&self, user_id: &str) -> CacheKey {
        CacheKey(format!("{}-{user_id}", self.user_info))
    }

    /// Key for the posts of `user_id`.
    pub fn user_posts_key(&self, user_id: &str) -> CacheKey {
        CacheKey(format!("{}-{user_id}", self.user_posts))
    }
}
