use tracing::{error, info, instrument};
use crate::app_system::CatalogError;
use crate::clients::{ProductClient, ResilientInventoryClient};
use crate::domain::{Product, ProductCode};

/// Client for the catalog read path.
///
/// Orchestrates the product store and the inventory service: products are
/// looked up locally and enriched with the live stock flag on the way out.
#[derive(Clone)]
pub struct CatalogClient {
    product_client: ProductClient,
    inventory_client: ResilientInventoryClient,
}

impl CatalogClient {
    pub fn new(product_client: ProductClient, inventory_client: ResilientInventoryClient) -> Self {
        Self {
            product_client,
            inventory_client,
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.product_client.find_all().await.map_err(|e| {
            error!(error = %e, "Product store unavailable");
            CatalogError::ProductStore(e)
        })?;
        products.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(products)
    }

    /// Product for `code` with `in_stock` derived from its current inventory
    /// level. The enriched flag lives only on the returned copy.
    #[instrument(skip(self), fields(product_code = %code))]
    pub async fn find_enriched_product(&self, code: ProductCode) -> Result<Option<Product>, CatalogError> {
        let product = self.product_client.find_by_code(code.clone()).await.map_err(|e| {
            error!(error = %e, "Product store unavailable");
            CatalogError::ProductStore(e)
        })?;

        let Some(mut product) = product else {
            info!("Product not found, skipping inventory lookup");
            return Ok(None);
        };

        info!(product_code = %code, "Fetching inventory level");
        if let Some(level) = self.inventory_client.lookup(&code).await {
            product.in_stock = level.in_stock();
        }
        Ok(Some(product))
    }
}
