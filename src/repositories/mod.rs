//! Repositories module - all SQL lives here
//!
//! One repository per entity. Services never touch the pool directly;
//! every query goes through a repository method returning `sqlx::Error`,
//! which the service layer converts into an `AppError` with `?`.

pub mod message;
pub mod product;
pub mod traits;
pub mod user;

// Re-exports to shorten imports
pub use traits::{Create, Delete, Read, Update};

pub use message::MessageRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
