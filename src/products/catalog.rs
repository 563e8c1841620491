use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use super::dto::{Product, ProductId};
use crate::{api::ApiClient, error::ApiError};

/// Reference weight for user-defined products; their nutrients are per 100 g.
const REFERENCE_WEIGHT_GRAMS: f64 = 100.0;

/// A user-defined product, nutrients per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub calories: f64,
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
    pub description: String,
}

/// Partial edit of a personal product. Unset fields stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proteins: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(flatten)]
    product: &'a NewProduct,
    weight: f64,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    id: ProductId,
    #[serde(flatten)]
    changes: &'a ProductChanges,
}

/// The caller's own products, kept next to the shared catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError>;
    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> Result<Product, ApiError>;
    async fn delete_product(&self, id: ProductId) -> Result<Product, ApiError>;
    async fn my_products(&self) -> Result<Vec<Product>, ApiError>;
}

#[async_trait]
impl ProductCatalog for ApiClient {
    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        if product.name.trim().is_empty() {
            return Err(ApiError::Validation("product name is required".into()));
        }
        let body = CreateBody {
            product,
            weight: REFERENCE_WEIGHT_GRAMS,
        };
        let req = self.authorized(Method::POST, "/product/product")?.json(&body);
        let created: Product = Self::send_checked_json(req).await?;
        info!(product_id = %created.id, "product created");
        Ok(created)
    }

    #[instrument(skip(self, changes))]
    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> Result<Product, ApiError> {
        let body = UpdateBody { id, changes };
        let req = self
            .authorized(Method::PUT, &format!("/product/update/{id}"))?
            .json(&body);
        let updated: Product = Self::send_checked_json(req).await?;
        info!(product_id = %updated.id, "product updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let req = self.authorized(Method::DELETE, &format!("/product/delete/{id}"))?;
        let removed: Product = Self::send_checked_json(req).await?;
        info!(product_id = %removed.id, "product deleted");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn my_products(&self) -> Result<Vec<Product>, ApiError> {
        let req = self.authorized(Method::GET, "/product/my-products")?;
        Self::send_json(req).await
    }
}
