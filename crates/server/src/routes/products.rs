//! Routes for the product catalog.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    category::Category,
    product::{CreateProduct, Product, UpdateProduct},
};
use deployment::Deployment;
use serde::Deserialize;
use services::services::product_filter::{ProductSelection, filter_products};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

const DEFAULT_PAGE_SIZE: i64 = 24;

/// GET /api/products
/// Storefront listing: the full catalog narrowed by the taxonomy selection
/// in the query string.
pub async fn list_products(
    State(deployment): State<DeploymentImpl>,
    Query(selection): Query<ProductSelection>,
) -> Result<ResponseJson<ApiResponse<Vec<Product>>>, ApiError> {
    let pool = &deployment.db().pool;
    let products = Product::find_all(pool).await?;
    let categories = Category::find_all(pool).await?;
    let filtered = filter_products(&products, &categories, &selection);
    Ok(ResponseJson(ApiResponse::success(filtered)))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub product_type: Option<Uuid>,
}

/// GET /api/products/page
/// Paginated listing ordered by price ascending.
pub async fn product_page(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<PageQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Product>>>, ApiError> {
    let products = Product::find_page(
        &deployment.db().pool,
        query.product_type,
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        query.offset.unwrap_or(0),
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(products)))
}

pub async fn get_product(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Product>>, ApiError> {
    let product = Product::find_by_id(&deployment.db().pool, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub async fn create_product(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateProduct>,
) -> Result<ResponseJson<ApiResponse<Product>>, ApiError> {
    let product = Product::create(&deployment.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub async fn update_product(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProduct>,
) -> Result<ResponseJson<ApiResponse<Product>>, ApiError> {
    let product = Product::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(ResponseJson(ApiResponse::success(product)))
}

pub async fn delete_product(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Product::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("product"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/products",
        Router::new()
            .route("/", get(list_products).post(create_product))
            .route("/page", get(product_page))
            .route(
                "/{id}",
                get(get_product).put(update_product).delete(delete_product),
            ),
    )
}
