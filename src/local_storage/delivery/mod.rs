pub mod delivery_local_storage;

pub use delivery_local_storage::DeliveryLocalStorage;
