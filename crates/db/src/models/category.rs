use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Level of a node in the device taxonomy.
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[sqlx(type_name = "category_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CategoryType {
    Brand,
    Series,
    Model,
}

/// One node of the brand → series → model taxonomy, stored flat with a
/// parent pointer. `sort_order` drives sibling ordering; NULL sorts as 0.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, TS)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub category_type: CategoryType,
    pub parent_id: Option<Uuid>,
    pub sort_order: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateCategory {
    pub name: String,
    pub category_type: CategoryType,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateCategory {
    pub name: String,
    pub category_type: CategoryType,
    pub parent_id: Option<Uuid>,
    pub sort_order: Option<i64>,
}

/// One entry of a bulk reorder write, produced when a sibling group is
/// drag-reordered in the admin UI.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ReorderEntry {
    pub id: Uuid,
    pub sort_order: i64,
}

const CATEGORY_COLUMNS: &str =
    "id, name, category_type, parent_id, sort_order, created_at, updated_at";

impl Category {
    /// All taxonomy records in insertion order, the base order the
    /// hierarchy builder uses as its tie-break.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// New nodes land at the end of their sibling group.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateCategory,
        id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let sibling_count: i64 = match data.parent_id {
            Some(parent_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                    .bind(parent_id)
                    .fetch_one(pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id IS NULL")
                    .fetch_one(pool)
                    .await?
            }
        };

        sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (id, name, category_type, parent_id, sort_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(data.category_type)
        .bind(data.parent_id)
        .bind(sibling_count)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateCategory,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories
             SET name = $2, category_type = $3, parent_id = $4, sort_order = $5,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(data.category_type)
        .bind(data.parent_id)
        .bind(data.sort_order)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Persist new sibling positions in one transaction so a half-applied
    /// drag never becomes visible.
    pub async fn reorder(pool: &SqlitePool, entries: &[ReorderEntry]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for entry in entries {
            sqlx::query(
                "UPDATE categories
                 SET sort_order = $2, updated_at = datetime('now', 'subsec')
                 WHERE id = $1",
            )
            .bind(entry.id)
            .bind(entry.sort_order)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await
    }
}
