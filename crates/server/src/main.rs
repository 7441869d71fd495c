use server::{DeploymentImpl, config::Config};

use deployment::Deployment;
use services::services::{cart_timeout::CartTimeoutService, database_validator::DatabaseValidator};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let deployment = DeploymentImpl::new(&config.database_url).await?;

    let validation = DatabaseValidator::new(deployment.db().pool.clone())
        .validate()
        .await?;
    if !validation.is_ok() {
        warn!("{}", validation.summary());
    }

    let _cart_sweeper =
        CartTimeoutService::spawn(deployment.db().clone(), deployment.carts().clone()).await;

    let app = server::app(deployment)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("listening on {}", config.bind_addr());
    axum::serve(listener, app).await?;

    Ok(())
}
