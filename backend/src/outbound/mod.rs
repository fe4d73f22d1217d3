//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **cache**: in-memory TTL cache implementing the `Cache` port
//! - **upstream**: reqwest-backed client for the upstream user/posts API
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod cache;
pub mod upstream;
