//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod state;
pub mod user_posts;
pub mod user_posts_dto;

pub use error::ApiResult;

/// Register the versioned REST endpoints.
///
/// # Examples
/// ```
/// use actix_web::App;
///
/// let app = App::new().configure(gateway::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/v1").service(user_posts::get_user_posts));
}
