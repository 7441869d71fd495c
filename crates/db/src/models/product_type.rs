use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Product-type taxonomy node. Unlike the device taxonomy there is no level
/// tag; depth is capped at two levels when the tree is rendered.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, TS)]
pub struct ProductType {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub sort_order: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateProductType {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateProductType {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub sort_order: Option<i64>,
}

const PRODUCT_TYPE_COLUMNS: &str = "id, name, parent_id, sort_order, created_at, updated_at";

impl ProductType {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProductType>(&format!(
            "SELECT {PRODUCT_TYPE_COLUMNS} FROM product_types ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProductType>(&format!(
            "SELECT {PRODUCT_TYPE_COLUMNS} FROM product_types WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateProductType,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ProductType>(&format!(
            "INSERT INTO product_types (id, name, parent_id)
             VALUES ($1, $2, $3)
             RETURNING {PRODUCT_TYPE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(data.parent_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateProductType,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProductType>(&format!(
            "UPDATE product_types
             SET name = $2, parent_id = $3, sort_order = $4,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {PRODUCT_TYPE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(data.sort_order)
        .fetch_optional(pool)
        .await
    }

    /// Deleting a node removes its whole subtree, matching the admin screen
    /// behavior. UNION (not UNION ALL) so malformed cyclic data cannot make
    /// the walk diverge.
    pub async fn delete_recursive(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "WITH RECURSIVE subtree(id) AS (
                 SELECT id FROM product_types WHERE id = $1
                 UNION
                 SELECT pt.id FROM product_types pt JOIN subtree s ON pt.parent_id = s.id
             )
             DELETE FROM product_types WHERE id IN (SELECT id FROM subtree)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
