use serde::{Deserialize, Serialize};
use super::ProductCode;

/// Stock level for one product as reported by the inventory service.
///
/// Wire form: `{ "productCode": "P100", "availableQuantity": 7 }`. A missing
/// quantity reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLevel {
    pub product_code: ProductCode,
    #[serde(default)]
    pub available_quantity: u32,
}

impl InventoryLevel {
    pub fn new(product_code: ProductCode, available_quantity: u32) -> Self {
        Self { product_code, available_quantity }
    }

    pub fn in_stock(&self) -> bool {
        self.available_quantity > 0
    }
}

/// A stock row owned by the inventory service.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub product_code: ProductCode,
    pub available_quantity: u32,
}

impl InventoryItem {
    pub fn level(&self) -> InventoryLevel {
        InventoryLevel::new(self.product_code.clone(), self.available_quantity)
    }
}

/// Payload for adding a stock row.
#[derive(Debug, Clone)]
pub struct InventoryItemCreate {
    pub product_code: ProductCode,
    pub available_quantity: u32,
}

/// Payload for changing the quantity of a stock row.
#[derive(Debug, Clone)]
pub struct InventoryItemPatch {
    pub available_quantity: u32,
}
