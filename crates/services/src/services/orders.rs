//! Checkout and order management.

use db::models::order::{ContactInfo, Order, OrderStatus};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::cart::{CartError, CartStore};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("cart error: {0}")]
    Cart(#[from] CartError),
    #[error("cart is empty")]
    EmptyCart,
    #[error("missing contact field: {0}")]
    MissingContactField(&'static str),
    #[error("order not found: {0}")]
    NotFound(Uuid),
}

pub struct OrderService;

impl OrderService {
    /// Checkout: validate the form, snapshot the cart into an order, then
    /// clear the cart. The order is written before the cart is cleared so
    /// a failure can only leave a stale cart, never a lost order.
    pub async fn place_order(
        pool: &SqlitePool,
        carts: &CartStore,
        session_id: Uuid,
        contact_info: ContactInfo,
    ) -> Result<Order, OrderError> {
        validate_contact(&contact_info)?;

        let cart = carts.get(session_id);
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order = Order::create(
            pool,
            Uuid::new_v4(),
            &contact_info,
            &cart.items,
            cart.total_price,
        )
        .await?;
        carts.clear(pool, session_id).await?;

        info!(
            order_id = %order.id,
            items = order.items.len(),
            total_price = order.total_price,
            "order placed"
        );
        Ok(order)
    }

    pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<Order>, OrderError> {
        Ok(Order::find_all(pool).await?)
    }

    pub async fn update_status(
        pool: &SqlitePool,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        Order::update_status(pool, id, status)
            .await?
            .ok_or(OrderError::NotFound(id))
    }
}

fn validate_contact(contact_info: &ContactInfo) -> Result<(), OrderError> {
    if contact_info.name.trim().is_empty() {
        return Err(OrderError::MissingContactField("name"));
    }
    if contact_info.email.trim().is_empty() {
        return Err(OrderError::MissingContactField("email"));
    }
    if contact_info.phone.trim().is_empty() {
        return Err(OrderError::MissingContactField("phone"));
    }
    if contact_info.address.trim().is_empty() {
        return Err(OrderError::MissingContactField("address"));
    }
    Ok(())
}
