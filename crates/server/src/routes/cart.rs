//! Routes for per-session carts.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::{cart::Cart, product::Product};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

pub async fn get_cart(
    State(deployment): State<DeploymentImpl>,
    Path(session_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Cart>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(
        deployment.carts().get(session_id),
    )))
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct AddCartItem {
    pub product_id: Uuid,
}

/// POST /api/cart/{session_id}/items
/// Add one unit of a product; the cart snapshots name, price and image.
pub async fn add_cart_item(
    State(deployment): State<DeploymentImpl>,
    Path(session_id): Path<Uuid>,
    axum::Json(payload): axum::Json<AddCartItem>,
) -> Result<ResponseJson<ApiResponse<Cart>>, ApiError> {
    let pool = &deployment.db().pool;
    let product = Product::find_by_id(pool, payload.product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    let cart = deployment
        .carts()
        .add_product(pool, session_id, &product)
        .await?;
    Ok(ResponseJson(ApiResponse::success(cart)))
}

pub async fn increase_cart_item(
    State(deployment): State<DeploymentImpl>,
    Path((session_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<Cart>>, ApiError> {
    let cart = deployment
        .carts()
        .increase(&deployment.db().pool, session_id, product_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(cart)))
}

pub async fn decrease_cart_item(
    State(deployment): State<DeploymentImpl>,
    Path((session_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<Cart>>, ApiError> {
    let cart = deployment
        .carts()
        .decrease(&deployment.db().pool, session_id, product_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(cart)))
}

pub async fn remove_cart_item(
    State(deployment): State<DeploymentImpl>,
    Path((session_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<Cart>>, ApiError> {
    let cart = deployment
        .carts()
        .remove(&deployment.db().pool, session_id, product_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(cart)))
}

pub async fn clear_cart(
    State(deployment): State<DeploymentImpl>,
    Path(session_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    deployment
        .carts()
        .clear(&deployment.db().pool, session_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/cart/{session_id}",
        Router::new()
            .route("/", get(get_cart).delete(clear_cart))
            .route("/items", post(add_cart_item))
            .route("/items/{product_id}", delete(remove_cart_item))
            .route("/items/{product_id}/increase", post(increase_cart_item))
            .route("/items/{product_id}/decrease", post(decrease_cart_item)),
    )
}
