use tracing::{debug, instrument};
use crate::domain::{InventoryItem, InventoryItemCreate, InventoryItemPatch, ProductCode};
use crate::inventory_actor::InventoryError;
use crate::actor_framework::StoreClient;

/// Client for the inventory store actor (the inventory service's own data).
#[derive(Clone)]
pub struct InventoryStoreClient {
    inner: StoreClient<InventoryItem>,
}

impl_store_client!(InventoryStoreClient, InventoryItem, ProductCode, InventoryError, get = find_by_product_code, list = find_all);

impl InventoryStoreClient {
    #[instrument(skip(self), fields(code = %item.product_code))]
    pub async fn create_item(&self, item: InventoryItemCreate) -> Result<InventoryItem, InventoryError> {
        debug!("Sending request");
        self.inner.create(item).await.map_err(InventoryError::from)
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(&self, code: ProductCode, available_quantity: u32) -> Result<InventoryItem, InventoryError> {
        debug!("Sending request");
        self.inner
            .update(code, InventoryItemPatch { available_quantity })
            .await
            .map_err(InventoryError::from)
    }
}
