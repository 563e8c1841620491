use tracing::{debug, info};
use uuid::Uuid;

use super::dto::{Meal, MealId, MealItem, MealRecord, SelectedProduct};
use crate::error::ValidationError;
use crate::nutrition::{aggregate, MealTotals};
use crate::products::{Product, ProductId};

/// Weight given to a product when it is first chosen.
pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;
/// Lowest weight a portion can be edited down to.
pub const MIN_PORTION_GRAMS: f64 = 1.0;

/// Raw weight input coming from a form field or a caller.
///
/// `None` means "missing or not a number"; it clamps like any other bad value.
pub trait RequestedWeight {
    fn grams(&self) -> Option<f64>;
}

impl RequestedWeight for f64 {
    fn grams(&self) -> Option<f64> {
        Some(*self)
    }
}

impl RequestedWeight for f32 {
    fn grams(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl RequestedWeight for i32 {
    fn grams(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl RequestedWeight for u32 {
    fn grams(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl RequestedWeight for str {
    fn grams(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }
}

impl RequestedWeight for String {
    fn grams(&self) -> Option<f64> {
        self.as_str().grams()
    }
}

impl<T: RequestedWeight> RequestedWeight for Option<T> {
    fn grams(&self) -> Option<f64> {
        self.as_ref().and_then(RequestedWeight::grams)
    }
}

impl<T: RequestedWeight + ?Sized> RequestedWeight for &T {
    fn grams(&self) -> Option<f64> {
        (**self).grams()
    }
}

/// `max(1, value)`, with anything non-numeric or non-finite landing on the floor.
pub fn clamp_weight(requested: Option<f64>) -> f64 {
    match requested {
        Some(g) if g.is_finite() => g.max(MIN_PORTION_GRAMS),
        _ => MIN_PORTION_GRAMS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Empty,
    NonEmpty,
}

/// The meal being put together in one add/edit session.
///
/// Edits never fail: duplicates and unknown ids are ignored, bad weights are
/// clamped. Only [`MealComposer::to_save_payload`] validates.
#[derive(Debug, Clone)]
pub struct MealComposer {
    session: Uuid,
    meal_id: Option<MealId>,
    selected: Vec<SelectedProduct>,
}

impl Default for MealComposer {
    fn default() -> Self {
        Self::initialize(None)
    }
}

impl MealComposer {
    /// Starts a session, seeded from `existing` when editing a stored meal.
    pub fn initialize(existing: Option<&MealRecord>) -> Self {
        let mut composer = Self {
            session: Uuid::new_v4(),
            meal_id: existing.map(|m| m.id),
            selected: Vec::new(),
        };
        if let Some(meal) = existing {
            for line in &meal.products {
                if composer.position(line.id).is_some() {
                    continue;
                }
                let mut item = line.to_selected();
                item.weight_grams = clamp_weight(Some(item.weight_grams));
                composer.selected.push(item);
            }
        }
        debug!(
            session = %composer.session,
            meal_id = ?composer.meal_id,
            products = composer.selected.len(),
            "meal composer started"
        );
        composer
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    /// Id of the stored meal being edited, `None` for a new one.
    pub fn meal_id(&self) -> Option<MealId> {
        self.meal_id
    }

    pub fn selected(&self) -> &[SelectedProduct] {
        &self.selected
    }

    pub fn get(&self, id: ProductId) -> Option<&SelectedProduct> {
        self.position(id).map(|i| &self.selected[i])
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn state(&self) -> ComposerState {
        if self.selected.is_empty() {
            ComposerState::Empty
        } else {
            ComposerState::NonEmpty
        }
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.selected.iter().position(|p| p.id() == id)
    }

    /// Adds `product` at the default weight. Returns `false` if it was already there.
    pub fn add_product(&mut self, product: Product) -> bool {
        if self.position(product.id).is_some() {
            debug!(session = %self.session, product_id = %product.id, "product already selected");
            return false;
        }
        debug!(session = %self.session, product_id = %product.id, name = %product.name, "product added");
        self.selected.push(SelectedProduct {
            product,
            weight_grams: DEFAULT_PORTION_GRAMS,
        });
        true
    }

    /// Sets the portion weight, clamped to at least one gram. Returns `false`
    /// if no such product is selected.
    pub fn update_weight(&mut self, id: ProductId, requested: impl RequestedWeight) -> bool {
        let Some(i) = self.position(id) else {
            return false;
        };
        let grams = clamp_weight(requested.grams());
        self.selected[i].weight_grams = grams;
        debug!(session = %self.session, product_id = %id, grams, "portion weight updated");
        true
    }

    /// Drops the product if present. Survivors keep their order.
    pub fn remove_product(&mut self, id: ProductId) -> bool {
        let Some(i) = self.position(id) else {
            return false;
        };
        self.selected.remove(i);
        debug!(session = %self.session, product_id = %id, "product removed");
        true
    }

    pub fn compute_totals(&self) -> MealTotals {
        aggregate(&self.selected)
    }

    pub fn to_save_payload(&self, name: &str) -> Result<Meal, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.selected.is_empty() {
            return Err(ValidationError::NoProducts);
        }

        let meal = Meal {
            id: self.meal_id,
            name: name.to_string(),
            totals: self.compute_totals(),
            products: self
                .selected
                .iter()
                .map(|p| MealItem {
                    product_id: p.id(),
                    weight_grams: p.weight_grams,
                })
                .collect(),
        };
        info!(
            session = %self.session,
            meal_id = ?meal.id,
            products = meal.products.len(),
            calories = meal.totals.calories,
            "meal payload ready"
        );
        Ok(meal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::StoredProduct;

    fn product(id: i64, calories: f64, proteins: f64, fats: f64, carbohydrates: f64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("product-{id}"),
            calories,
            proteins,
            fats,
            carbohydrates,
            description: None,
            has_picture: false,
            picture: None,
        }
    }

    fn line(id: i64, weight_grams: f64, calories: f64, proteins: f64) -> StoredProduct {
        StoredProduct {
            id: ProductId(id),
            name: format!("product-{id}"),
            weight_grams,
            calories,
            proteins,
            fats: 0.0,
            carbohydrates: 0.0,
            description: None,
            has_picture: false,
            picture: None,
        }
    }

    fn ids(c: &MealComposer) -> Vec<i64> {
        c.selected().iter().map(|p| p.id().0).collect()
    }

    #[test]
    fn starts_empty() {
        let c = MealComposer::initialize(None);
        assert_eq!(c.state(), ComposerState::Empty);
        assert_eq!(c.meal_id(), None);
        assert_eq!(c.compute_totals(), MealTotals::default());
    }

    #[test]
    fn add_uses_default_weight() {
        let mut c = MealComposer::default();
        assert!(c.add_product(product(1, 52.0, 0.3, 0.2, 14.0)));
        assert_eq!(c.state(), ComposerState::NonEmpty);
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, DEFAULT_PORTION_GRAMS);
    }

    #[test]
    fn duplicate_add_keeps_first_entry() {
        let mut c = MealComposer::default();
        c.add_product(product(1, 52.0, 0.3, 0.2, 14.0));
        c.update_weight(ProductId(1), 250);
        assert!(!c.add_product(product(1, 999.0, 0.0, 0.0, 0.0)));
        assert_eq!(c.len(), 1);
        let kept = c.get(ProductId(1)).unwrap();
        assert_eq!(kept.weight_grams, 250.0);
        assert_eq!(kept.product.calories, 52.0);
    }

    #[test]
    fn weight_edits_clamp_to_one_gram() {
        let mut c = MealComposer::default();
        c.add_product(product(1, 100.0, 0.0, 0.0, 0.0));

        assert!(c.update_weight(ProductId(1), -5));
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 1.0);

        c.update_weight(ProductId(1), 80);
        assert!(c.update_weight(ProductId(1), "abc"));
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 1.0);

        c.update_weight(ProductId(1), 80);
        c.update_weight(ProductId(1), None::<f64>);
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 1.0);

        c.update_weight(ProductId(1), f64::NAN);
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 1.0);

        c.update_weight(ProductId(1), " 42.5 ");
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 42.5);

        c.update_weight(ProductId(1), 0.4);
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 1.0);
    }

    #[test]
    fn weight_update_for_unknown_id_is_ignored() {
        let mut c = MealComposer::default();
        c.add_product(product(1, 100.0, 0.0, 0.0, 0.0));
        assert!(!c.update_weight(ProductId(2), 300));
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 100.0);
        assert!(c.get(ProductId(2)).is_none());
    }

    #[test]
    fn remove_unknown_id_changes_nothing() {
        let mut c = MealComposer::default();
        c.add_product(product(1, 100.0, 0.0, 0.0, 0.0));
        c.add_product(product(2, 100.0, 0.0, 0.0, 0.0));
        let before = c.selected().to_vec();
        assert!(!c.remove_product(ProductId(9)));
        assert_eq!(c.selected(), before.as_slice());
    }

    #[test]
    fn remove_preserves_insertion_order() {
        let mut c = MealComposer::default();
        for id in 1..=4 {
            c.add_product(product(id, 10.0, 0.0, 0.0, 0.0));
        }
        c.remove_product(ProductId(2));
        c.add_product(product(5, 10.0, 0.0, 0.0, 0.0));
        assert_eq!(ids(&c), vec![1, 3, 4, 5]);
        let payload = c.to_save_payload("Dinner").unwrap();
        let order: Vec<i64> = payload.products.iter().map(|i| i.product_id.0).collect();
        assert_eq!(order, vec![1, 3, 4, 5]);
    }

    #[test]
    fn payload_validation() {
        let mut c = MealComposer::default();
        assert_eq!(c.to_save_payload("Breakfast"), Err(ValidationError::NoProducts));

        c.add_product(product(1, 0.0, 20.0, 0.0, 0.0));
        assert_eq!(c.to_save_payload(""), Err(ValidationError::EmptyName));
        assert_eq!(c.to_save_payload("   \t"), Err(ValidationError::EmptyName));

        c.update_weight(ProductId(1), 150);
        let meal = c.to_save_payload("  Breakfast ").unwrap();
        assert_eq!(meal.name, "Breakfast");
        assert_eq!(meal.id, None);
        assert_eq!(meal.totals.proteins, 30.0);
        assert_eq!(meal.totals.weight_grams, 150.0);
        assert_eq!(
            meal.products,
            vec![MealItem { product_id: ProductId(1), weight_grams: 150.0 }]
        );
    }

    #[test]
    fn add_adjust_remove_scenario() {
        let mut c = MealComposer::initialize(None);
        let p1 = product(1, 200.0, 0.0, 0.0, 0.0);
        c.add_product(p1.clone());
        c.add_product(p1.clone());
        assert_eq!(c.len(), 1);
        c.update_weight(p1.id, 50);
        assert_eq!(c.compute_totals().calories, 100.0);
        c.remove_product(p1.id);
        assert_eq!(c.compute_totals().calories, 0.0);
        assert_eq!(c.state(), ComposerState::Empty);
    }

    #[test]
    fn editing_existing_meal_seeds_selection_and_id() {
        let record = MealRecord {
            id: MealId(42),
            name: "Lunch".into(),
            totals: MealTotals::default(),
            recorded_at: None,
            products: vec![
                line(1, 200.0, 200.0, 20.0),
                line(2, 0.0, 0.0, 0.0),
                line(1, 10.0, 99.9, 0.0),
            ],
        };
        let c = MealComposer::initialize(Some(&record));
        assert_eq!(c.meal_id(), Some(MealId(42)));
        assert_eq!(ids(&c), vec![1, 2]);
        assert_eq!(c.get(ProductId(1)).unwrap().weight_grams, 200.0);
        assert_eq!(c.get(ProductId(1)).unwrap().product.calories, 100.0);
        assert_eq!(c.get(ProductId(2)).unwrap().weight_grams, 1.0);

        let meal = c.to_save_payload("Lunch").unwrap();
        assert_eq!(meal.id, Some(MealId(42)));
        assert_eq!(meal.totals.calories, 200.0);
        assert_eq!(meal.totals.proteins, 20.0);
    }

    #[test]
    fn seeded_totals_match_the_stored_meal() {
        let record = MealRecord {
            id: MealId(7),
            name: "Snack".into(),
            totals: MealTotals {
                weight_grams: 250.0,
                calories: 754.0,
                proteins: 20.15,
                ..Default::default()
            },
            recorded_at: None,
            products: vec![line(1, 50.0, 26.0, 0.15), line(2, 200.0, 728.0, 20.0)],
        };
        let mut c = MealComposer::initialize(Some(&record));
        let totals = c.compute_totals();
        assert_eq!(totals.calories, record.totals.calories);
        assert_eq!(totals.weight_grams, record.totals.weight_grams);
        assert!((totals.proteins - record.totals.proteins).abs() < 1e-9);

        c.update_weight(ProductId(1), 100);
        assert_eq!(c.compute_totals().calories, 52.0 + 728.0);
    }
}
