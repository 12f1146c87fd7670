//! HTTP inbound adapter exposing the `/api/v1` REST endpoints.

pub mod auth;
pub mod books;
pub mod error;
pub mod health;
pub mod state;
pub mod users;

pub use error::ApiResult;
