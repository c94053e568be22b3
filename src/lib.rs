pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod local_storage;
pub mod models;
pub mod services;


pub use config::Config;
pub use controller::Controller;
pub use error::{AppError, Result};
