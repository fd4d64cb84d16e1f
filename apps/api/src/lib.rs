pub mod router;

use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, DatabaseBackend};
use shared_database::{MemoryStore, Store, SupabaseStore};

pub use router::create_router;

pub fn build_store(config: &AppConfig) -> Arc<dyn Store> {
    match config.database_backend {
        DatabaseBackend::Memory => {
            info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
        DatabaseBackend::Supabase => {
            info!("Using Supabase store at {}", config.supabase_url);
            Arc::new(SupabaseStore::new(config))
        }
    }
}
