pub mod memory;
pub mod supabase;
pub mod traits;

pub use memory::InMemoryBackend;
pub use supabase::SupabaseBackend;
pub use traits::BackendClient;
