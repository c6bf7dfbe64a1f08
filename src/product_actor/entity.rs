use crate::actor_framework::Record;
use crate::domain::{Product, ProductCode, ProductCreate, ProductPatch};

impl Record for Product {
    type Key = ProductCode;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;

    fn key(&self) -> &ProductCode { &self.code }

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Surrogate identifier generated by the store
    /// * `payload` - Code, name, description and price
    fn from_create(id: String, payload: ProductCreate) -> Result<Self, String> {
        if payload.price < 0.0 {
            return Err(format!("Negative price for {}: {}", payload.code, payload.price));
        }
        Ok(Self {
            id,
            code: payload.code,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            in_stock: false,
        })
    }

    /// Updates catalog attributes. Stock is never part of a product patch.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            if price < 0.0 {
                return Err(format!("Negative price for {}: {}", self.code, price));
            }
            self.price = price;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        Ok(())
    }
}
