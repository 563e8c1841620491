use serde::{Deserialize, Serialize};
use time::Date;

use crate::nutrition::{
    targets::{ActivityLevel, Aim, Gender, TargetsError},
    BodyProfile,
};

/// One day's entry of the body-weight log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    #[serde(rename = "weight")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub recorded_at: Option<Date>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WeightUpdate {
    pub weight: f64,
}

/// The signed-in user as the service reports it. Body metrics are optional
/// until the user fills them in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub login: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub aim: Option<String>,
    #[serde(default)]
    pub recommended_calories: Option<f64>,
}

impl UserProfile {
    /// Metrics for [`crate::nutrition::recommended_intake`]; fails on the first
    /// missing or unparsable field.
    pub fn body_profile(&self) -> Result<BodyProfile, TargetsError> {
        Ok(BodyProfile {
            weight_kg: self.weight.ok_or(TargetsError::Missing("weight"))?,
            height_cm: self.height.ok_or(TargetsError::Missing("height"))?,
            age_years: self.age.ok_or(TargetsError::Missing("age"))?,
            gender: self
                .gender
                .as_deref()
                .ok_or(TargetsError::Missing("gender"))?
                .parse::<Gender>()?,
            activity: self
                .activity_level
                .as_deref()
                .ok_or(TargetsError::Missing("activity level"))?
                .parse::<ActivityLevel>()?,
            aim: self
                .aim
                .as_deref()
                .ok_or(TargetsError::Missing("aim"))?
                .parse::<Aim>()?,
        })
    }
}
