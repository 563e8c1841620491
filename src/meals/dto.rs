use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::nutrition::{Macros, MealTotals, Portion};
use crate::products::{Product, ProductId};

/// Service-assigned meal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(pub i64);

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A product chosen into a meal, with its own copy of the catalog values.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedProduct {
    pub product: Product,
    pub weight_grams: f64,
}

impl SelectedProduct {
    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

impl Portion for SelectedProduct {
    fn per_100g(&self) -> Macros {
        self.product.per_100g()
    }

    fn weight_grams(&self) -> f64 {
        self.weight_grams
    }
}

/// One `(product, grams)` line of a save payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealItem {
    pub product_id: ProductId,
    #[serde(rename = "product_weight")]
    pub weight_grams: f64,
}

/// Payload handed to persistence. `id` decides between create and update
/// and is never part of the body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    #[serde(skip)]
    pub id: Option<MealId>,
    pub name: String,
    #[serde(flatten)]
    pub totals: MealTotals,
    pub products: Vec<MealItem>,
}

/// One product line of a stored meal. Unlike a catalog [`Product`], the
/// service reports nutrients for the whole portion, not per 100 g.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "weight")]
    pub weight_grams: f64,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_picture: bool,
    #[serde(default)]
    pub picture: Option<String>,
}

impl StoredProduct {
    /// Back to a per-100g snapshot plus weight. Zero-gram lines come back
    /// with zero nutrients.
    pub fn to_selected(&self) -> SelectedProduct {
        let factor = if self.weight_grams > 0.0 {
            100.0 / self.weight_grams
        } else {
            0.0
        };
        SelectedProduct {
            product: Product {
                id: self.id,
                name: self.name.clone(),
                calories: self.calories * factor,
                proteins: self.proteins * factor,
                fats: self.fats * factor,
                carbohydrates: self.carbohydrates * factor,
                description: self.description.clone(),
                has_picture: self.has_picture,
                picture: self.picture.clone(),
            },
            weight_grams: self.weight_grams,
        }
    }
}

/// A meal as stored by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealRecord {
    pub id: MealId,
    pub name: String,
    #[serde(flatten)]
    pub totals: MealTotals,
    #[serde(default)]
    pub recorded_at: Option<Date>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub products: Vec<StoredProduct>,
}

fn null_as_false<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}
