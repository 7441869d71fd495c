use axum::{Router, response::Json as ResponseJson, routing::get};
use utils::response::ApiResponse;

use crate::DeploymentImpl;

pub async fn health() -> ResponseJson<ApiResponse<String>> {
    ResponseJson(ApiResponse::success("ok".to_string()))
}

pub fn router(_deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().route("/health", get(health))
}
