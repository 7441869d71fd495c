//! Routes for the product-type taxonomy.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::product_type::{CreateProductType, ProductType, UpdateProductType};
use deployment::Deployment;
use services::services::hierarchy::{HierarchyConfig, OrphanPolicy, TreeNode, build_forest};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

/// Product types render as two levels: type → subcategory.
const PRODUCT_TYPE_TREE_DEPTH: usize = 1;

pub async fn list_product_types(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<ProductType>>>, ApiError> {
    let product_types = ProductType::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(product_types)))
}

pub async fn product_type_tree(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<TreeNode<ProductType>>>>, ApiError> {
    let product_types = ProductType::find_all(&deployment.db().pool).await?;
    let config = HierarchyConfig {
        max_depth: Some(PRODUCT_TYPE_TREE_DEPTH),
        orphan_policy: OrphanPolicy::Drop,
    };
    let forest = build_forest(&product_types, &config);
    Ok(ResponseJson(ApiResponse::success(forest)))
}

pub async fn create_product_type(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateProductType>,
) -> Result<ResponseJson<ApiResponse<ProductType>>, ApiError> {
    let product_type =
        ProductType::create(&deployment.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(product_type)))
}

pub async fn update_product_type(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateProductType>,
) -> Result<ResponseJson<ApiResponse<ProductType>>, ApiError> {
    let product_type = ProductType::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("product type"))?;
    Ok(ResponseJson(ApiResponse::success(product_type)))
}

/// DELETE /api/product-types/{id}
/// Removes the node and everything nested under it.
pub async fn delete_product_type(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = ProductType::delete_recursive(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("product type"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/product-types",
        Router::new()
            .route("/", get(list_product_types).post(create_product_type))
            .route("/tree", get(product_type_tree))
            .route("/{id}", put(update_product_type).delete(delete_product_type)),
    )
}
