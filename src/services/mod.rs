pub mod merge_service;
pub mod progress_service;

pub use merge_service::merge_records;
pub use progress_service::derive_progress;
