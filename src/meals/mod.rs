pub mod composer;
mod dto;
pub mod repo;

pub use composer::{ComposerState, MealComposer, RequestedWeight};
pub use dto::{Meal, MealId, MealItem, MealRecord, SelectedProduct, StoredProduct};
pub use repo::MealPersistence;
