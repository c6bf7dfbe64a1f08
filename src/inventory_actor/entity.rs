use crate::actor_framework::Record;
use crate::domain::{InventoryItem, InventoryItemCreate, InventoryItemPatch, ProductCode};

impl Record for InventoryItem {
    type Key = ProductCode;
    type CreatePayload = InventoryItemCreate;
    type Patch = InventoryItemPatch;

    fn key(&self) -> &ProductCode { &self.product_code }

    fn from_create(id: String, payload: InventoryItemCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            product_code: payload.product_code,
            available_quantity: payload.available_quantity,
        })
    }

    fn on_update(&mut self, patch: InventoryItemPatch) -> Result<(), String> {
        self.available_quantity = patch.available_quantity;
        Ok(())
    }
}
