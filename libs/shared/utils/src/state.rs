use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::Store;

use crate::blacklist::TokenBlacklist;

/// Shared handler state: configuration, the record store and the token blacklist.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub blacklist: Arc<TokenBlacklist>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            blacklist: Arc::new(TokenBlacklist::new()),
        }
    }
}
