pub mod error;
pub mod memory;
pub mod overlay;
pub mod redb;
pub mod seed_loader;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryStore;
pub use overlay::OverlayKV;
pub use redb::RedbStore;
pub use seed_loader::SeedLoader;
pub use traits::KVStore;
