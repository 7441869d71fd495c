use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

/// A catalog entry. `model_ids` references the device taxonomy's model
/// level; a product may fit any number of models.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, TS)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub product_type_id: Option<Uuid>,
    #[sqlx(json)]
    pub model_ids: Vec<Uuid>,
    #[sqlx(json)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub product_type_id: Option<Uuid>,
    #[serde(default)]
    pub model_ids: Vec<Uuid>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub product_type_id: Option<Uuid>,
    pub model_ids: Vec<Uuid>,
    pub image_urls: Vec<String>,
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, product_type_id, model_ids, \
                               image_urls, created_at, updated_at";

impl Product {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Storefront page fetch: cheapest first, optional product-type filter.
    pub async fn find_page(
        pool: &SqlitePool,
        product_type_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match product_type_id {
            Some(type_id) => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                     WHERE product_type_id = $1
                     ORDER BY price ASC, rowid ASC
                     LIMIT $2 OFFSET $3"
                ))
                .bind(type_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products
                     ORDER BY price ASC, rowid ASC
                     LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateProduct,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (id, name, description, price, product_type_id, model_ids, image_urls)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.product_type_id)
        .bind(Json(&data.model_ids))
        .bind(Json(&data.image_urls))
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products
             SET name = $2, description = $3, price = $4, product_type_id = $5,
                 model_ids = $6, image_urls = $7, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.product_type_id)
        .bind(Json(&data.model_ids))
        .bind(Json(&data.image_urls))
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
