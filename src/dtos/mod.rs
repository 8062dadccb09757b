//! DTOs module - wire-facing shapes
//!
//! DTOs separate the external representation (API, WebSocket events) from
//! the internal representation (entities).

pub mod conversation;
pub mod message;
pub mod product;
pub mod user;
pub mod ws_event;

// Re-exports to shorten imports
pub use conversation::{BulkDeleteDTO, BulkDeleteResultDTO, ConversationSummaryDTO};
pub use message::{CreateMessageDTO, MessageDTO};
pub use product::{CreateProductDTO, ProductDTO, UpdateProductDTO};
pub use user::{CreateUserDTO, LoginDTO, UserDTO};
pub use ws_event::{SendMessagePayload, WsClientEvent, WsServerEvent};
