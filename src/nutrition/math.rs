use serde::{Deserialize, Serialize};

/// Macronutrient values for a fixed quantity of food (per 100 g unless stated).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

/// Something eaten in a given amount: per-100g macros plus a weight in grams.
pub trait Portion {
    fn per_100g(&self) -> Macros;
    fn weight_grams(&self) -> f64;
}

/// Sums for a whole meal. Never stored on its own, always recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealTotals {
    #[serde(rename = "weight")]
    pub weight_grams: f64,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

impl MealTotals {
    fn add(self, per_100g: Macros, weight_grams: f64) -> Self {
        Self {
            weight_grams: self.weight_grams + weight_grams,
            calories: self.calories + scale(per_100g.calories, weight_grams),
            proteins: self.proteins + scale(per_100g.proteins, weight_grams),
            fats: self.fats + scale(per_100g.fats, weight_grams),
            carbohydrates: self.carbohydrates + scale(per_100g.carbohydrates, weight_grams),
        }
    }
}

/// Contribution of a per-100g nutrient value at `weight_grams`.
pub fn scale(per_100g: f64, weight_grams: f64) -> f64 {
    per_100g * weight_grams / 100.0
}

/// Folds every portion into a single set of totals. No rounding happens here.
pub fn aggregate<'a, P, I>(portions: I) -> MealTotals
where
    P: Portion + 'a,
    I: IntoIterator<Item = &'a P>,
{
    portions
        .into_iter()
        .fold(MealTotals::default(), |acc, p| acc.add(p.per_100g(), p.weight_grams()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(Macros, f64);

    impl Portion for Item {
        fn per_100g(&self) -> Macros {
            self.0
        }
        fn weight_grams(&self) -> f64 {
            self.1
        }
    }

    fn macros(calories: f64, proteins: f64, fats: f64, carbohydrates: f64) -> Macros {
        Macros { calories, proteins, fats, carbohydrates }
    }

    fn assert_close(a: &MealTotals, b: &MealTotals) {
        let eps = 1e-9;
        assert!((a.weight_grams - b.weight_grams).abs() < eps, "{a:?} vs {b:?}");
        assert!((a.calories - b.calories).abs() < eps, "{a:?} vs {b:?}");
        assert!((a.proteins - b.proteins).abs() < eps, "{a:?} vs {b:?}");
        assert!((a.fats - b.fats).abs() < eps, "{a:?} vs {b:?}");
        assert!((a.carbohydrates - b.carbohydrates).abs() < eps, "{a:?} vs {b:?}");
    }

    #[test]
    fn scale_is_linear_in_weight() {
        assert_eq!(scale(52.0, 150.0), 78.0);
        assert_eq!(scale(20.0, 150.0), 30.0);
        assert_eq!(scale(0.0, 500.0), 0.0);
        assert_eq!(scale(364.0, 100.0), 364.0);
    }

    #[test]
    fn empty_selection_yields_zero_totals() {
        let totals = aggregate::<Item, _>(&[]);
        assert_eq!(totals, MealTotals::default());
        assert_eq!(totals.weight_grams, 0.0);
    }

    #[test]
    fn aggregate_sums_scaled_contributions() {
        let items = [
            Item(macros(52.0, 0.3, 0.2, 14.0), 150.0),
            Item(macros(364.0, 10.0, 1.0, 76.0), 50.0),
        ];
        let totals = aggregate(&items);
        let expected = MealTotals {
            weight_grams: 200.0,
            calories: 78.0 + 182.0,
            proteins: 0.45 + 5.0,
            fats: 0.3 + 0.5,
            carbohydrates: 21.0 + 38.0,
        };
        assert_close(&totals, &expected);
    }

    #[test]
    fn aggregate_does_not_depend_on_order() {
        let forward = vec![
            Item(macros(52.0, 0.3, 0.2, 14.0), 137.5),
            Item(macros(250.0, 26.0, 15.0, 0.0), 80.0),
            Item(macros(41.0, 0.9, 0.1, 9.6), 33.3),
        ];
        let reversed: Vec<Item> = forward
            .iter()
            .rev()
            .map(|i| Item(i.0, i.1))
            .collect();
        assert_close(&aggregate(&forward), &aggregate(&reversed));
    }

    #[test]
    fn totals_serialize_with_wire_field_names() {
        let totals = MealTotals { weight_grams: 150.0, calories: 78.0, ..Default::default() };
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["weight"], 150.0);
        assert_eq!(json["calories"], 78.0);
        assert!(json.get("weight_grams").is_none());
    }
}
