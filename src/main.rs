mod domain;
mod clients;

mod app_system;
mod resilience;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

mod actor_framework;
mod product_actor;
mod inventory_actor;

use tracing::{error, info, Instrument};
use crate::app_system::{setup_tracing, CatalogConfig, CatalogError, CatalogSystem};
use crate::domain::{InventoryItemCreate, ProductCode, ProductCreate, ProductPatch};

fn code(raw: &str) -> Result<ProductCode, CatalogError> {
    ProductCode::new(raw).ok_or_else(|| CatalogError::InvalidProductCode(raw.to_string()))
}

/// Seeds a small catalog so the read path has something to enrich.
async fn seed(system: &CatalogSystem) -> Result<(), CatalogError> {
    let products = [
        ("P001", "Tea Kettle", 34.5, Some(12)),
        ("P002", "French Press", 28.0, Some(0)),
        ("P003", "Pour-over Stand", 19.9, None),
    ];
    for (raw, name, price, stock) in products {
        system
            .product_client
            .create_product(ProductCreate {
                code: code(raw)?,
                name: name.to_string(),
                description: None,
                price,
            })
            .await?;
        if let Some(available_quantity) = stock {
            system
                .inventory_store_client
                .create_item(InventoryItemCreate { product_code: code(raw)?, available_quantity })
                .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), CatalogError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CatalogConfig::load()?;
    info!(
        source = ?config.inventory.source,
        base_url = %config.inventory.base_url,
        "Starting catalog service"
    );

    let system = CatalogSystem::new(&config)?;

    async { seed(&system).await }
        .instrument(tracing::info_span!("seeding"))
        .await?;

    let span = tracing::info_span!("enrichment");
    async {
        for raw in ["P001", "P002", "P003", "P404"] {
            match system.catalog_client.find_enriched_product(code(raw)?).await {
                Ok(Some(product)) => info!(product_code = %product.code, in_stock = product.in_stock, "Product enriched"),
                Ok(None) => info!(product_code = raw, "Product not found"),
                Err(e) => error!(error = %e, "Enrichment failed"),
            }
        }
        Ok::<_, CatalogError>(())
    }
    .instrument(span)
    .await?;

    // Restock and reprice P002, then read it again
    system.inventory_store_client.set_quantity(code("P002")?, 8).await?;
    let patch = ProductPatch { price: Some(26.5), ..ProductPatch::default() };
    let repriced = system.product_client.update_product(code("P002")?, patch).await?;
    info!(product_code = %repriced.code, price = repriced.price, "Product repriced");
    if let Some(product) = system.catalog_client.find_enriched_product(code("P002")?).await? {
        info!(product_code = %product.code, in_stock = product.in_stock, "Product enriched after restock");
    }

    let products = system.catalog_client.find_all_products().await?;
    info!(count = products.len(), "Catalog listed");

    if let Some(breaker) = system.breakers.get(&config.inventory.command_key) {
        let metrics = breaker.metrics();
        info!(
            command = breaker.name(),
            state = %breaker.state(),
            admitted = metrics.admitted,
            successes = metrics.successes,
            failures = metrics.failures,
            rejected = metrics.rejected,
            trips = metrics.trips,
            consecutive_failures = metrics.consecutive_failures,
            "Inventory circuit summary"
        );
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Catalog service completed successfully");
    Ok(())
}
