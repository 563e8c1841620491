pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod meals;
pub mod nutrition;
pub mod products;
pub mod users;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, Error, ValidationError};
