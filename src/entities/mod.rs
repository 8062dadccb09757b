//! Entities module - persisted domain rows
//!
//! Every entity here maps to one table in the database.

pub mod enums;
pub mod message;
pub mod product;
pub mod user;

// Re-exports to shorten imports
pub use enums::{Role, Sender, SubscriptionStatus};
pub use message::Message;
pub use product::Product;
pub use user::User;
