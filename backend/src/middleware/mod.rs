//! Request middleware.
//!
//! Purpose: define middleware for request lifecycle concerns: completion
//! logging with a request id, and the per-request panic boundary.

pub mod recover;
pub mod request_log;

pub use recover::Recover;
pub use request_log::RequestLog;
