use std::sync::Arc;

use cache::KeyValueStore;
use config::Config;
use gateway::CachedGateway;

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod sheets;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Option<Arc<dyn KeyValueStore>>,
    pub gateway: Arc<CachedGateway>,
}
