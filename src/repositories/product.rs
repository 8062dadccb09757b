//! ProductRepository - catalog storage.

use chrono::Utc;
use sqlx::{Error, SqlitePool};

use super::{Create, Delete, Read, Update};
use crate::dtos::{CreateProductDTO, UpdateProductDTO};
use crate::entities::Product;

pub struct ProductRepository {
    connection_pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Product>, Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, title, description, price_cents, image_ref, created_at
            FROM products
            ORDER BY created_at DESC, product_id DESC
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<Product, CreateProductDTO> for ProductRepository {
    async fn create(&self, data: &CreateProductDTO) -> Result<Product, Error> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO products (title, description, price_cents, image_ref, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(&data.image_ref)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            title: data.title.clone(),
            description: data.description.clone(),
            price_cents: data.price_cents,
            image_ref: data.image_ref.clone(),
            created_at: now,
        })
    }
}

impl Read<Product, i64> for ProductRepository {
    async fn read(&self, id: &i64) -> Result<Option<Product>, Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, title, description, price_cents, image_ref, created_at
            FROM products
            WHERE product_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Product, UpdateProductDTO, i64> for ProductRepository {
    async fn update(&self, id: &i64, data: &UpdateProductDTO) -> Result<Product, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        let title = data.title.clone().unwrap_or(current.title);
        let description = data.description.clone().unwrap_or(current.description);
        let price_cents = data.price_cents.unwrap_or(current.price_cents);
        let image_ref = data.image_ref.clone().or(current.image_ref);

        sqlx::query(
            r#"
            UPDATE products
            SET title = ?, description = ?, price_cents = ?, image_ref = ?
            WHERE product_id = ?
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(price_cents)
        .bind(&image_ref)
        .bind(id)
        .execute(&self.connection_pool)
        .await?;

        Ok(Product {
            product_id: *id,
            title,
            description,
            price_cents,
            image_ref,
            created_at: current.created_at,
        })
    }
}

impl Delete<i64> for ProductRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(())
    }
}
