mod dto;
pub mod services;

pub use dto::{UserProfile, WeightEntry};
