use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use tracing::{debug, instrument};

use super::dto::{Product, SearchQuery};
use crate::{api::ApiClient, error::ApiError};

/// Looks products up by name in the remote catalog.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Blank queries return no results without contacting the service.
    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError>;
}

#[async_trait]
impl ProductSearch for ApiClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let req = self
            .authorized(Method::GET, "/product/search")?
            .query(&SearchQuery { query });
        let products: Vec<Product> = Self::send_json(req).await?;
        debug!(count = products.len(), "search results");
        Ok(products)
    }
}

impl ApiClient {
    /// Raw picture bytes, fetched from the path the service advertised in
    /// `product.picture`. `None` without a request when there is no picture.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn product_picture(&self, product: &Product) -> Result<Option<Bytes>, ApiError> {
        let Some(path) = product.picture.as_deref().filter(|_| product.has_picture) else {
            return Ok(None);
        };
        let req = self.authorized(Method::GET, path)?;
        Self::send_bytes(req).await.map(Some)
    }
}
