use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type, types::Json};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::cart::CartItem;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Ready,
    Fulfilled,
}

/// Customer details captured at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A placed order: a frozen snapshot of the cart plus contact details.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Order {
    pub id: Uuid,
    #[sqlx(json)]
    pub contact_info: ContactInfo,
    #[sqlx(json)]
    pub items: Vec<CartItem>,
    pub total_price: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

const ORDER_COLUMNS: &str = "id, contact_info, items, total_price, status, created_at";

impl Order {
    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        contact_info: &ContactInfo,
        items: &[CartItem],
        total_price: f64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (id, contact_info, items, total_price, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(contact_info))
        .bind(Json(items))
        .bind(total_price)
        .bind(OrderStatus::Pending)
        .fetch_one(pool)
        .await
    }

    /// Admin listing, newest first.
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2 WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }
}
