use async_trait::async_trait;
use reqwest::Method;
use time::Date;
use tracing::{debug, info, instrument};

use super::dto::{Meal, MealId, MealRecord};
use crate::{api::ApiClient, error::ApiError};

/// Stores composed meals.
#[async_trait]
pub trait MealPersistence: Send + Sync {
    /// Creates the meal when `meal.id` is `None`, updates it otherwise.
    async fn save(&self, meal: &Meal) -> Result<MealRecord, ApiError>;
    async fn delete(&self, id: MealId) -> Result<(), ApiError>;
    /// Meals logged on `date`, each with its product lines.
    async fn list_by_date(&self, date: Date) -> Result<Vec<MealRecord>, ApiError>;
}

#[async_trait]
impl MealPersistence for ApiClient {
    #[instrument(skip(self, meal), fields(meal_id = ?meal.id, name = %meal.name))]
    async fn save(&self, meal: &Meal) -> Result<MealRecord, ApiError> {
        let req = match meal.id {
            Some(id) => self.authorized(Method::PUT, &format!("/meal/{id}"))?,
            None => self.authorized(Method::POST, "/meal/add")?,
        };
        let saved: MealRecord = Self::send_json(req.json(meal)).await?;
        info!(meal_id = %saved.id, "meal saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: MealId) -> Result<(), ApiError> {
        let req = self.authorized(Method::DELETE, &format!("/meal/{id}"))?;
        Self::send_empty(req).await?;
        info!(meal_id = %id, "meal deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_date(&self, date: Date) -> Result<Vec<MealRecord>, ApiError> {
        // `/meal/date/{date}` leaves `products` empty; seeding an edit from it
        // would drop every stored line on the next save.
        let req = self.authorized(
            Method::GET,
            &format!("/meal/user_meals_with_products/info/{date}"),
        )?;
        let meals: Vec<MealRecord> = Self::send_json(req).await?;
        debug!(count = meals.len(), "meals loaded");
        Ok(meals)
    }
}
