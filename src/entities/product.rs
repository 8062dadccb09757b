//! Product entity - one catalog item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub product_id: i64,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    // opaque reference produced by the external upload service
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}
