use async_trait::async_trait;
use presente_core::catalog::{CatalogError, ProductCatalog};
use presente_core::domain::product::Product;
use tracing::{debug, warn};

use crate::client::{SupabaseClient, PRODUCTS_PATH};
use crate::error::SupabaseError;

/// Active rows of the `products` table, read through PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseCatalog {
    client: SupabaseClient,
}

impl SupabaseCatalog {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn fetch(&self) -> Result<Vec<Product>, SupabaseError> {
        let mut url = self.client.endpoint(PRODUCTS_PATH)?;
        url.query_pairs_mut().append_pair("select", "*").append_pair("is_active", "eq.true");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SupabaseError::Status { status: status.as_u16() });
        }
        Ok(response.json::<Vec<Product>>().await?)
    }
}

#[async_trait]
impl ProductCatalog for SupabaseCatalog {
    async fn active_products(&self) -> Result<Vec<Product>, CatalogError> {
        match self.fetch().await {
            Ok(products) => {
                debug!(event_name = "catalog.remote.loaded", count = products.len(), "catalog loaded");
                Ok(products.into_iter().filter(|product| product.is_active).collect())
            }
            Err(error) => {
                warn!(event_name = "catalog.remote.failed", error = %error, "catalog unavailable");
                Err(CatalogError::Unavailable(error.to_string()))
            }
        }
    }
}
