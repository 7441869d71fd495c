use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json};
use ts_rs::TS;
use uuid::Uuid;

use super::product::Product;

/// One line of a cart, a denormalized snapshot of the product at the time
/// it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: f64,
    pub image_url: String,
    pub quantity: i64,
}

/// Cart contents for one session. Totals are always recomputed from the
/// line items, never adjusted in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_quantity: i64,
    pub total_price: f64,
}

impl Cart {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            items,
            ..Self::default()
        };
        cart.recalculate();
        cart
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adding an already-carted product bumps its quantity instead of
    /// creating a second line.
    pub fn add_product(&mut self, product: &Product) {
        match self.items.iter_mut().find(|i| i.product_id == product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image_url: product.image_urls.first().cloned().unwrap_or_default(),
                quantity: 1,
            }),
        }
        self.recalculate();
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
        self.recalculate();
    }

    pub fn increase(&mut self, product_id: Uuid) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity += 1;
        }
        self.recalculate();
    }

    /// Decreasing the last unit removes the line entirely.
    pub fn decrease(&mut self, product_id: Uuid) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            if item.quantity > 1 {
                item.quantity -= 1;
            } else {
                self.items.retain(|i| i.product_id != product_id);
            }
        }
        self.recalculate();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    fn recalculate(&mut self) {
        self.total_quantity = self.items.iter().map(|i| i.quantity).sum();
        self.total_price = self
            .items
            .iter()
            .map(|i| i.price * i.quantity as f64)
            .sum();
    }
}

#[derive(Debug, Clone, FromRow)]
struct CartRow {
    id: Uuid,
    #[sqlx(json)]
    items: Vec<CartItem>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl Cart {
    pub async fn load_all(pool: &SqlitePool) -> Result<Vec<(Uuid, Cart)>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CartRow>("SELECT id, items, updated_at FROM carts")
            .fetch_all(pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.id, Cart::from_items(row.items)))
            .collect())
    }

    pub async fn upsert(
        pool: &SqlitePool,
        session_id: Uuid,
        cart: &Cart,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO carts (id, items, updated_at)
             VALUES ($1, $2, datetime('now', 'subsec'))
             ON CONFLICT(id) DO UPDATE
             SET items = excluded.items, updated_at = excluded.updated_at",
        )
        .bind(session_id)
        .bind(Json(&cart.items))
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, session_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Drop carts untouched for `max_idle_days`, returning the session ids
    /// removed so in-memory state can follow.
    pub async fn delete_stale(
        pool: &SqlitePool,
        max_idle_days: i64,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let cutoff = format!("-{max_idle_days} days");
        let removed: Vec<(Uuid,)> = sqlx::query_as(
            "DELETE FROM carts
             WHERE datetime(updated_at) < datetime('now', $1)
             RETURNING id",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;
        Ok(removed.into_iter().map(|(id,)| id).collect())
    }
}
