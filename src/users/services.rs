use reqwest::Method;
use time::Date;
use tracing::{info, instrument};

use super::dto::{UserProfile, WeightEntry, WeightUpdate};
use crate::{api::ApiClient, error::ApiError};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let req = self.authorized(Method::GET, "/user/me")?;
        Self::send_json(req).await
    }

    /// Records today's body weight, replacing an earlier entry for the same day.
    #[instrument(skip(self))]
    pub async fn record_weight(&self, weight_kg: f64) -> Result<WeightEntry, ApiError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(ApiError::Validation(format!("invalid weight {weight_kg}")));
        }
        let req = self
            .authorized(Method::PUT, "/user_weight/me")?
            .json(&WeightUpdate { weight: weight_kg });
        let entry: WeightEntry = Self::send_json(req).await?;
        info!(entry_id = entry.id, "weight recorded");
        Ok(entry)
    }

    /// The entry for `date`, `None` if nothing was logged that day.
    #[instrument(skip(self))]
    pub async fn weight_on(&self, date: Date) -> Result<Option<WeightEntry>, ApiError> {
        let req = self.authorized(Method::GET, &format!("/user_weight/me/{date}"))?;
        Self::send_json(req).await
    }

    /// Recent weight log, oldest first.
    #[instrument(skip(self))]
    pub async fn weight_history(&self) -> Result<Vec<WeightEntry>, ApiError> {
        let req = self.authorized(Method::GET, "/user_weight/history/me")?;
        Self::send_json(req).await
    }
}
