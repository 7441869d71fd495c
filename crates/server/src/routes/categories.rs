//! Routes for the device taxonomy (brand → series → model).

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::category::{Category, CreateCategory, ReorderEntry, UpdateCategory};
use deployment::Deployment;
use serde::Deserialize;
use services::services::hierarchy::{HierarchyConfig, OrphanPolicy, TreeNode, build_forest};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

/// The device taxonomy is three levels deep: brand is depth 0, models at
/// depth 2 never render children.
const DEVICE_TREE_DEPTH: usize = 2;

pub async fn list_categories(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = Category::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    pub depth: Option<usize>,
}

/// GET /api/categories/tree
/// The nested shape the admin tree and storefront dropdowns render.
pub async fn category_tree(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<TreeQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<TreeNode<Category>>>>, ApiError> {
    let categories = Category::find_all(&deployment.db().pool).await?;
    let config = HierarchyConfig {
        max_depth: Some(query.depth.unwrap_or(DEVICE_TREE_DEPTH)),
        orphan_policy: OrphanPolicy::Drop,
    };
    let forest = build_forest(&categories, &config);
    Ok(ResponseJson(ApiResponse::success(forest)))
}

pub async fn create_category(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = Category::create(&deployment.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn update_category(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = Category::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("category"))?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn delete_category(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = Category::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("category"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

/// PUT /api/categories/reorder
/// Persist the sibling positions produced by a drag-reorder.
pub async fn reorder_categories(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<Vec<ReorderEntry>>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Category::reorder(&deployment.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/categories",
        Router::new()
            .route("/", get(list_categories).post(create_category))
            .route("/tree", get(category_tree))
            .route("/reorder", put(reorder_categories))
            .route("/{id}", put(update_category).delete(delete_category)),
    )
}
