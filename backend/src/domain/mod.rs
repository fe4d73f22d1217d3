//! Domain primitives, ports, and services.
//!
//! Purpose: define the records fetched from the upstream API, the error
//! taxonomy for upstream failures, and the cache-aside service that sits in
//! front of any upstream source. Nothing here knows about HTTP servers or
//! reqwest.
//!
//! Public surface:
//! - UserProfile, Post (alias to `user_profile::*`): upstream records.
//! - ClientError (alias to `client_error::ClientError`): classified
//!   non-2xx upstream response.
//! - CachedUserPostsSource: cache-aside decorator over a source port.

pub mod cached_user_posts_source;
pub mod client_error;
pub mod ports;
pub mod user_profile;

pub use self::cached_user_posts_source::{CachedUpstreamValue, CachedUserPostsSource};
pub use self::client_error::{ClientError, EMPTY_RESPONSE_MESSAGE};
pub use self::user_profile::{Address, Company, Geo, Post, UserProfile};
