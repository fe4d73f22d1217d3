//! Upstream REST API adapters.
//!
//! This module provides a thin reqwest implementation of the
//! `UserPostsSource` port.

mod dto;
mod http_source;

pub use http_source::{HttpSourceBuildError, HttpUserPostsSource};
