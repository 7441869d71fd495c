//! Routes for the admin users screen.

use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::user::{CreateUser, UpdateUser, User};
use deployment::Deployment;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{DeploymentImpl, error::ApiError};

pub async fn list_users(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, ApiError> {
    let users = User::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(users)))
}

pub async fn create_user(
    State(deployment): State<DeploymentImpl>,
    axum::Json(payload): axum::Json<CreateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = User::create(&deployment.db().pool, &payload, Uuid::new_v4()).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn update_user(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = User::update(&deployment.db().pool, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(deployment): State<DeploymentImpl>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = User::delete(&deployment.db().pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("user"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/users",
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route("/{id}", put(update_user).delete(delete_user)),
    )
}
