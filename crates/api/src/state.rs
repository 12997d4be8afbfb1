use std::sync::Arc;

use crowdfund_db::DbPool;

use crate::config::{ServerConfig, TokenConfig};

/// Handler state. Cloned per request; the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn tokens(&self) -> &TokenConfig {
        &self.config.tokens
    }
}
