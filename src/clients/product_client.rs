use tracing::{debug, instrument};
use crate::domain::{Product, ProductCode, ProductCreate, ProductPatch};
use crate::product_actor::ProductError;
use crate::actor_framework::StoreClient;

/// Client for the product store actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: StoreClient<Product>,
}

impl_store_client!(ProductClient, Product, ProductCode, ProductError, get = find_by_code, list = find_all);

impl ProductClient {
    #[instrument(skip(self), fields(code = %product.code))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(product).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, code: ProductCode, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(code, patch).await.map_err(ProductError::from)
    }
}
