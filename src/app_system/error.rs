use thiserror::Error;
use crate::app_system::ConfigError;
use crate::clients::EndpointError;
use crate::inventory_actor::InventoryError;
use crate::product_actor::ProductError;

/// Errors surfaced by the catalog system. Inventory outages are not among
/// them: those are absorbed by the resilient inventory client.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product store error: {0}")]
    ProductStore(#[from] ProductError),
    #[error("Inventory store error: {0}")]
    InventoryStore(#[from] InventoryError),
    #[error("Inventory endpoint setup failed: {0}")]
    EndpointSetup(#[from] EndpointError),
    #[error("Invalid product code: {0:?}")]
    InvalidProductCode(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Store task failed: {0}")]
    Shutdown(String),
}
