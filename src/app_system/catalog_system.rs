use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};
use crate::actor_framework::StoreActor;
use crate::app_system::{CatalogConfig, CatalogError, InventorySource};
use crate::clients::{
    CatalogClient, HttpInventoryEndpoint, InventoryEndpoint, InventoryStoreClient,
    LocalInventoryEndpoint, ProductClient, ResilientInventoryClient,
};
use crate::domain::{InventoryItem, Product};
use crate::resilience::CircuitBreakerRegistry;

fn id_generator(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// The catalog application: store actors, clients, and the shared breakers.
///
/// Everything is wired here by hand; collaborators are passed into
/// constructors so tests can swap any of them.
pub struct CatalogSystem {
    pub catalog_client: CatalogClient,
    pub product_client: ProductClient,
    pub inventory_store_client: InventoryStoreClient,
    pub breakers: Arc<CircuitBreakerRegistry>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts the system with the inventory source named in `config`.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        match config.inventory.source {
            InventorySource::Local => Ok(Self::build(config, None)),
            InventorySource::Remote => {
                let endpoint = HttpInventoryEndpoint::new(
                    &config.inventory.base_url,
                    config.inventory.connect_timeout(),
                    config.inventory.request_timeout(),
                )?;
                let endpoint: Arc<dyn InventoryEndpoint> = Arc::new(endpoint);
                Ok(Self::build(config, Some(endpoint)))
            }
        }
    }

    /// Starts the system against a caller-supplied inventory endpoint.
    pub fn with_endpoint(config: &CatalogConfig, endpoint: Arc<dyn InventoryEndpoint>) -> Self {
        Self::build(config, Some(endpoint))
    }

    fn build(config: &CatalogConfig, endpoint: Option<Arc<dyn InventoryEndpoint>>) -> Self {
        info!(source = ?config.inventory.source, "Starting catalog system");

        // 1. Product store
        let (product_actor, product_store) = StoreActor::<Product>::new(32, id_generator("product"));
        let product_client = ProductClient::new(product_store);
        let product_handle = tokio::spawn(product_actor.run());

        // 2. Inventory store (the inventory service's own data)
        let (inventory_actor, inventory_store) = StoreActor::<InventoryItem>::new(32, id_generator("item"));
        let inventory_store_client = InventoryStoreClient::new(inventory_store);
        let inventory_handle = tokio::spawn(inventory_actor.run());

        // 3. Resilient inventory client, one breaker per command key
        let endpoint: Arc<dyn InventoryEndpoint> = match endpoint {
            Some(endpoint) => endpoint,
            None => Arc::new(LocalInventoryEndpoint::new(inventory_store_client.clone())),
        };
        let breakers = Arc::new(CircuitBreakerRegistry::new());
        let breaker = breakers.get_or_create(&config.inventory.command_key, config.inventory.breaker());
        let inventory_client = ResilientInventoryClient::new(endpoint, breaker, config.inventory.request_timeout());

        // 4. Catalog read path
        let catalog_client = CatalogClient::new(product_client.clone(), inventory_client);

        Self {
            catalog_client,
            product_client,
            inventory_store_client,
            breakers,
            handles: vec![product_handle, inventory_handle],
        }
    }

    pub async fn shutdown(self) -> Result<(), CatalogError> {
        info!("Shutting down catalog system...");
        // Store actors stop once every client handle is gone.
        drop(self.catalog_client);
        drop(self.product_client);
        drop(self.inventory_store_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(CatalogError::Shutdown(e.to_string()));
            }
        }

        info!("Catalog system shutdown complete.");
        Ok(())
    }
}
