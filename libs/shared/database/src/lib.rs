pub mod memory;
pub mod store;
pub mod supabase;
pub mod supabase_store;

pub use memory::MemoryStore;
pub use store::{Store, StoreError, StoreResult};
pub use supabase::SupabaseClient;
pub use supabase_store::SupabaseStore;
