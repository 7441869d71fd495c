pub mod config;
pub mod error;
pub mod routes;

use axum::Router;
use local_deployment::LocalDeployment;

pub type DeploymentImpl = LocalDeployment;

/// The full application router with state applied.
pub fn app(deployment: DeploymentImpl) -> Router {
    routes::router(&deployment).with_state(deployment)
}
