use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::nutrition::Macros;

/// Catalog identifier of a product. Opaque to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Catalog entry. Nutrient values are per 100 g and taken as-is from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_picture: bool,
    /// Service path of the picture, present only when `has_picture` is set.
    #[serde(default, skip_serializing)]
    pub picture: Option<String>,
}

impl Product {
    pub fn per_100g(&self) -> Macros {
        Macros {
            calories: self.calories,
            proteins: self.proteins,
            fats: self.fats,
            carbohydrates: self.carbohydrates,
        }
    }
}

fn null_as_false<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchQuery<'a> {
    pub query: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_service_product() {
        let json = r#"{
            "id": 7,
            "name": "Apple",
            "weight": 100,
            "calories": 52,
            "proteins": 0.3,
            "fats": 0.2,
            "carbohydrates": 14,
            "description": null,
            "has_picture": null,
            "picture": null
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, ProductId(7));
        assert_eq!(p.calories, 52.0);
        assert_eq!(p.description, None);
        assert!(!p.has_picture);
        assert_eq!(p.picture, None);
    }

    #[test]
    fn missing_picture_flag_defaults_to_false() {
        let json = r#"{"id":1,"name":"Rice","calories":130,"proteins":2.7,"fats":0.3,"carbohydrates":28}"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert!(!p.has_picture);
        assert_eq!(p.per_100g().carbohydrates, 28.0);
    }
}
