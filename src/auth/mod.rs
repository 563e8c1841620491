mod claims;
mod context;
mod dto;
pub mod services;

pub use claims::TokenClaims;
pub use context::AuthContext;
pub use services::is_valid_email;
