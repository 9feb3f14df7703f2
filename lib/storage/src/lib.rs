pub mod store;
pub mod loader;

pub use store::{ContextStore, ContextStores, MemoryStore, Scope};
pub use loader::CatalogLoader;
