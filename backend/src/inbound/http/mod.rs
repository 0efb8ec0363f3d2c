//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod history;
pub mod measurements;
pub mod schemas;
pub mod state;
pub mod summary;
#[cfg(test)]
pub mod test_utils;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// JSON extractor configuration shared by every body-accepting endpoint.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(error::json_error_handler)
}
