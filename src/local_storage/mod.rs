pub mod core_local_storage;
pub mod delivery;

pub use core_local_storage::{CoreLocalStorage, StorageError};
