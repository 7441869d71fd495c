//! Seam between request handlers and the environment they run in.
//!
//! Handlers only ever see this trait, so tests can swap in a deployment
//! built on an in-memory database and an empty cart store.

use std::sync::Arc;

use db::DBService;
use services::services::cart::CartStore;

pub trait Deployment: Clone + Send + Sync + 'static {
    fn db(&self) -> &DBService;

    fn carts(&self) -> &Arc<CartStore>;
}
