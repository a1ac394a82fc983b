//! Storage infrastructure - Key store implementations

mod factory;
mod file;
mod in_memory;
mod lock;

pub use factory::{StorageFactory, StorageType};
pub use file::JsonFileKeyStore;
pub use in_memory::InMemoryKeyStore;
pub use lock::FileLock;
