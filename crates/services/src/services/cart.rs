//! Process-wide cart state with an explicit lifecycle: hydrate from the
//! `carts` table at startup, persist on every mutation, drop the row when
//! a cart is cleared. Reads never touch the database after hydration.

use dashmap::DashMap;
use db::models::{cart::Cart, product::Product};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One cart per anonymous session id.
#[derive(Default)]
pub struct CartStore {
    carts: DashMap<Uuid, Cart>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every persisted cart into memory. Called once at startup.
    pub async fn hydrate(pool: &SqlitePool) -> Result<Self, CartError> {
        let rows = Cart::load_all(pool).await?;
        let store = Self::new();
        let count = rows.len();
        for (session_id, cart) in rows {
            store.carts.insert(session_id, cart);
        }
        info!(carts = count, "cart store hydrated");
        Ok(store)
    }

    /// Unknown sessions read as an empty cart.
    pub fn get(&self, session_id: Uuid) -> Cart {
        self.carts
            .get(&session_id)
            .map(|cart| cart.clone())
            .unwrap_or_default()
    }

    pub async fn add_product(
        &self,
        pool: &SqlitePool,
        session_id: Uuid,
        product: &Product,
    ) -> Result<Cart, CartError> {
        self.mutate(pool, session_id, |cart| cart.add_product(product))
            .await
    }

    pub async fn increase(
        &self,
        pool: &SqlitePool,
        session_id: Uuid,
        product_id: Uuid,
    ) -> Result<Cart, CartError> {
        self.mutate(pool, session_id, |cart| cart.increase(product_id))
            .await
    }

    pub async fn decrease(
        &self,
        pool: &SqlitePool,
        session_id: Uuid,
        product_id: Uuid,
    ) -> Result<Cart, CartError> {
        self.mutate(pool, session_id, |cart| cart.decrease(product_id))
            .await
    }

    pub async fn remove(
        &self,
        pool: &SqlitePool,
        session_id: Uuid,
        product_id: Uuid,
    ) -> Result<Cart, CartError> {
        self.mutate(pool, session_id, |cart| cart.remove(product_id))
            .await
    }

    /// Clearing also unpersists; an empty cart row is the same as no row.
    pub async fn clear(&self, pool: &SqlitePool, session_id: Uuid) -> Result<(), CartError> {
        self.carts.remove(&session_id);
        Cart::delete(pool, session_id).await?;
        Ok(())
    }

    /// Forget sessions already removed from the table (stale-cart sweep).
    pub fn forget_sessions(&self, session_ids: &[Uuid]) {
        for session_id in session_ids {
            self.carts.remove(session_id);
        }
    }

    /// Apply a reducer under the map entry's lock, then persist the result.
    /// The lock is released before the write so no await happens under it.
    async fn mutate<F>(&self, pool: &SqlitePool, session_id: Uuid, f: F) -> Result<Cart, CartError>
    where
        F: FnOnce(&mut Cart),
    {
        let cart = {
            let mut entry = self.carts.entry(session_id).or_default();
            f(entry.value_mut());
            entry.value().clone()
        };
        Cart::upsert(pool, session_id, &cart).await?;
        Ok(cart)
    }
}
