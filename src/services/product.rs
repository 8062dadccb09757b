//! Product services - catalog CRUD. Reads are public, writes admin-only
//! (enforced by the route layers, not re-checked here).

use crate::core::{AppError, AppState};
use crate::dtos::{CreateProductDTO, ProductDTO, UpdateProductDTO};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductDTO>>, AppError> {
    let products = state.product.find_all().await?;
    Ok(Json(products.into_iter().map(ProductDTO::from).collect()))
}

#[instrument(skip(state), fields(product_id))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductDTO>, AppError> {
    let product = state
        .product
        .read(&product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(ProductDTO::from(product)))
}

#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateProductDTO>,
) -> Result<(StatusCode, Json<ProductDTO>), AppError> {
    body.validate()?;
    let product = state.product.create(&body).await?;
    info!(product_id = product.product_id, "Product created");
    Ok((StatusCode::CREATED, Json(ProductDTO::from(product))))
}

#[instrument(skip(state, body), fields(product_id))]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
    Json(body): Json<UpdateProductDTO>,
) -> Result<Json<ProductDTO>, AppError> {
    body.validate()?;
    let product = state.product.update(&product_id, &body).await?;
    info!(product_id, "Product updated");
    Ok(Json(ProductDTO::from(product)))
}

#[instrument(skip(state), fields(product_id))]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.product.delete(&product_id).await?;
    info!(product_id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
