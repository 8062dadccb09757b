//! Common repository traits
//!
//! Generic interfaces for the plain CRUD half of the storage layer. The
//! message store has its own domain-specific surface and does not use them.

/// Trait for creating new entities in the database
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the database)
/// * `CreateDTO` - DTO for creation (without ID)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity and returns it with its database-assigned ID.
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for reading a single entity by primary key
pub trait Read<Entity, Id> {
    /// Returns `Ok(None)` when no entity carries that ID.
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Trait for updating existing entities
///
/// `UpdateDTO` carries optional fields; only `Some(_)` fields are written.
pub trait Update<Entity, UpdateDTO, Id> {
    /// Returns the updated entity, or `RowNotFound` if the ID is unknown.
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for deleting entities
pub trait Delete<Id> {
    /// Idempotent: deleting an absent ID is a no-op.
    async fn delete(&self, id: &Id) -> Result<(), sqlx::Error>;
}
