//! Deployment backed by a local SQLite file (or in-memory for tests).

use std::sync::Arc;

use db::DBService;
use deployment::Deployment;
use services::services::cart::CartStore;

#[derive(Clone)]
pub struct LocalDeployment {
    db: DBService,
    carts: Arc<CartStore>,
}

impl LocalDeployment {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let db = DBService::new(database_url).await?;
        let carts = Arc::new(CartStore::hydrate(&db.pool).await?);
        Ok(Self { db, carts })
    }

    /// Fresh in-memory deployment for tests.
    pub async fn new_in_memory() -> anyhow::Result<Self> {
        let db = DBService::new_in_memory().await?;
        let carts = Arc::new(CartStore::hydrate(&db.pool).await?);
        Ok(Self { db, carts })
    }
}

impl Deployment for LocalDeployment {
    fn db(&self) -> &DBService {
        &self.db
    }

    fn carts(&self) -> &Arc<CartStore> {
        &self.carts
    }
}
