use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::math::MealTotals;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetsError {
    #[error("unknown gender '{0}', expected male or female")]
    Gender(String),
    #[error("unknown activity level '{0}', expected sedentary, light, moderate, active or very_active")]
    Activity(String),
    #[error("unknown aim '{0}', expected loss, maintain or gain")]
    Aim(String),
    #[error("profile has no {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aim {
    Loss,
    Maintain,
    Gain,
}

impl FromStr for Gender {
    type Err = TargetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(TargetsError::Gender(s.to_string())),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = TargetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very_active" => Ok(Self::VeryActive),
            _ => Err(TargetsError::Activity(s.to_string())),
        }
    }
}

impl FromStr for Aim {
    type Err = TargetsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loss" => Ok(Self::Loss),
            "maintain" => Ok(Self::Maintain),
            "gain" => Ok(Self::Gain),
            _ => Err(TargetsError::Aim(s.to_string())),
        }
    }
}

impl ActivityLevel {
    fn factor(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

impl Aim {
    fn factor(self) -> f64 {
        match self {
            Self::Loss => 0.8,
            Self::Maintain => 1.0,
            Self::Gain => 1.2,
        }
    }

    /// Share of daily calories for (protein, fat, carbohydrates).
    fn split(self) -> (f64, f64, f64) {
        match self {
            Self::Loss => (0.4, 0.3, 0.3),
            Self::Maintain => (0.3, 0.3, 0.4),
            Self::Gain => (0.25, 0.25, 0.5),
        }
    }
}

/// Body metrics and goals used for the daily intake recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity: ActivityLevel,
    pub aim: Aim,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

impl DailyTargets {
    /// What is left for the day after `eaten`. Negative once a target is exceeded.
    pub fn remaining(&self, eaten: &MealTotals) -> DailyTargets {
        DailyTargets {
            calories: self.calories - eaten.calories,
            proteins: self.proteins - eaten.proteins,
            fats: self.fats - eaten.fats,
            carbohydrates: self.carbohydrates - eaten.carbohydrates,
        }
    }
}

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_CARBS: f64 = 4.0;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
fn basal_metabolic_rate(p: &BodyProfile) -> f64 {
    let base = 10.0 * p.weight_kg + 6.25 * p.height_cm - 5.0 * f64::from(p.age_years);
    match p.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn recommended_intake(profile: &BodyProfile) -> DailyTargets {
    let bmr = basal_metabolic_rate(profile);
    let calories = round2(bmr * profile.activity.factor() * profile.aim.factor());
    let (protein, fat, carbs) = profile.aim.split();

    let targets = DailyTargets {
        calories,
        proteins: round2(calories * protein / KCAL_PER_G_PROTEIN),
        fats: round2(calories * fat / KCAL_PER_G_FAT),
        carbohydrates: round2(calories * carbs / KCAL_PER_G_CARBS),
    };
    debug!(bmr, calories = targets.calories, aim = ?profile.aim, "daily targets computed");
    targets
}
