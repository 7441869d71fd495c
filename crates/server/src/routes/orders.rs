//! Routes for checkout and order management.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::order::{ContactInfo, Order, OrderStatus};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::orders::OrderService;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateOrder {
    pub session_id: Uuid,
    pub contact_info: ContactInfo,
}

/// POST /api/orders
/// Checkout: turn the session's cart into an order.
pub async fn create_order(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateOrder>,
) -> Result<ResponseJson<ApiResponse<Order>>, ApiError> {
    let order = OrderService::place_order(
        &deployment.db().pool,
        deployment.carts(),
        payload.session_id,
        payload.contact_info,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub async fn list_orders(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Order>>>, ApiError> {
    let orders = OrderService::list_orders(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(orders)))
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

pub async fn update_order_status(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateOrderStatus>,
) -> Result<ResponseJson<ApiResponse<Order>>, ApiError> {
    let order = OrderService::update_status(&deployment.db().pool, id, payload.status).await?;
    Ok(ResponseJson(ApiResponse::success(order)))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/orders",
        Router::new()
            .route("/", get(list_orders).post(create_order))
            .route("/{id}/status", put(update_order_status)),
    )
}
