pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod product_types;
pub mod products;
pub mod users;

use axum::Router;

use crate::DeploymentImpl;

pub fn router(deployment: &DeploymentImpl) -> Router<DeploymentImpl> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(health::router(deployment))
            .merge(categories::router(deployment))
            .merge(product_types::router(deployment))
            .merge(products::router(deployment))
            .merge(cart::router(deployment))
            .merge(orders::router(deployment))
            .merge(users::router(deployment)),
    )
}
