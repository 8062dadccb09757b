//! Product DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::Product;

#[derive(Serialize, Deserialize, Debug)]
pub struct ProductDTO {
    pub product_id: i64,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductDTO {
    fn from(value: Product) -> Self {
        Self {
            product_id: value.product_id,
            title: value.title,
            description: value.description,
            price_cents: value.price_cents,
            image_ref: value.image_ref,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateProductDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: i64,

    pub image_ref: Option<String>,
}

/// Partial update: only `Some(_)` fields are written.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateProductDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: Option<i64>,

    pub image_ref: Option<String>,
}
