//! Core module - infrastructure components
//!
//! Authentication and JWT, configuration, error handling, shared state.

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

// Re-exports to shorten imports
pub use auth::{admin_only_middleware, authentication_middleware, decode_jwt, encode_jwt, Claims};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
