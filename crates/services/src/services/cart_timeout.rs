//! Background sweeper for abandoned carts.
//!
//! Anonymous sessions never say goodbye, so carts accumulate. The sweeper
//! deletes rows untouched for longer than the idle limit and drops the
//! matching in-memory entries.

use std::{sync::Arc, time::Duration};

use db::{DBService, models::cart::Cart};
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::time::interval;
use tracing::{debug, error, info};

use super::cart::CartStore;

#[derive(Debug, Error)]
pub enum CartTimeoutError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Background service that prunes stale carts.
pub struct CartTimeoutService {
    db: DBService,
    carts: Arc<CartStore>,
    poll_interval: Duration,
    max_idle_days: i64,
}

impl CartTimeoutService {
    /// Spawn the sweeper with its default cadence: hourly checks, carts
    /// idle for 30 days are dropped.
    pub async fn spawn(db: DBService, carts: Arc<CartStore>) -> tokio::task::JoinHandle<()> {
        let service = Self {
            db,
            carts,
            poll_interval: Duration::from_secs(3600),
            max_idle_days: 30,
        };
        tokio::spawn(async move {
            service.start().await;
        })
    }

    async fn start(&self) {
        info!(
            "Starting cart timeout service with interval {:?}, max idle: {} days",
            self.poll_interval, self.max_idle_days
        );

        let mut interval = interval(self.poll_interval);

        loop {
            interval.tick().await;
            if let Err(e) =
                Self::sweep_once(&self.db.pool, &self.carts, self.max_idle_days).await
            {
                error!("Error sweeping stale carts: {}", e);
            }
        }
    }

    /// One sweep pass: delete stale rows, then forget their sessions.
    pub async fn sweep_once(
        pool: &SqlitePool,
        carts: &CartStore,
        max_idle_days: i64,
    ) -> Result<usize, CartTimeoutError> {
        let removed = Cart::delete_stale(pool, max_idle_days).await?;

        if removed.is_empty() {
            debug!("cart sweep: nothing stale");
            return Ok(0);
        }

        info!(count = removed.len(), "cart sweep: removed stale carts");
        carts.forget_sessions(&removed);
        Ok(removed.len())
    }
}
