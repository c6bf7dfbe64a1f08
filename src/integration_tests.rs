#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use crate::app_system::{CatalogConfig, CatalogError, CatalogSystem, InventoryClientConfig};
    use crate::clients::{CatalogClient, ProductClient, ResilientInventoryClient, FALLBACK_AVAILABLE_QUANTITY};
    use crate::domain::{InventoryItemCreate, Product, ProductCode, ProductCreate, ProductPatch};
    use crate::mock_framework::{create_mock_client, expect_get, FakeInventoryEndpoint, FakeResponse};
    use crate::product_actor::ProductError;
    use crate::resilience::{CircuitBreaker, CircuitState};

    fn code(raw: &str) -> ProductCode {
        ProductCode::new(raw).unwrap()
    }

    fn config(failure_threshold: u32) -> CatalogConfig {
        CatalogConfig {
            inventory: InventoryClientConfig {
                failure_threshold,
                request_timeout_ms: 200,
                cooldown_ms: 5_000,
                ..InventoryClientConfig::default()
            },
        }
    }

    async fn seed_product(system: &CatalogSystem, raw: &str) {
        system
            .product_client
            .create_product(ProductCreate {
                code: code(raw),
                name: format!("Product {raw}"),
                description: None,
                price: 10.0,
            })
            .await
            .unwrap();
    }

    async fn seed_stock(system: &CatalogSystem, raw: &str, available_quantity: u32) {
        system
            .inventory_store_client
            .create_item(InventoryItemCreate { product_code: code(raw), available_quantity })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_product_never_calls_inventory() {
        let (product_inner, mut product_rx) = create_mock_client::<Product>(10);
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Quantity(7)));
        let breaker = Arc::new(CircuitBreaker::new("inventory-by-productcode", Default::default()));
        let inventory_client = ResilientInventoryClient::new(endpoint.clone(), breaker, Duration::from_millis(200));
        let catalog_client = CatalogClient::new(ProductClient::new(product_inner), inventory_client);

        let task = tokio::spawn(async move { catalog_client.find_enriched_product(code("NOPE")).await });

        let (key, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
        assert_eq!(key, code("NOPE"));
        responder.send(Ok(None)).unwrap();

        assert!(task.await.unwrap().unwrap().is_none());
        assert_eq!(endpoint.calls(), 0);
    }

    #[tokio::test]
    async fn test_enrichment_against_local_inventory() {
        let system = CatalogSystem::new(&config(5)).unwrap();
        for raw in ["P001", "P002", "P003"] {
            seed_product(&system, raw).await;
        }
        seed_stock(&system, "P001", 7).await;
        seed_stock(&system, "P002", 0).await;

        let stocked = system.catalog_client.find_enriched_product(code("P001")).await.unwrap().unwrap();
        assert!(stocked.in_stock);

        let sold_out = system.catalog_client.find_enriched_product(code("P002")).await.unwrap().unwrap();
        assert!(!sold_out.in_stock);

        // No stock row: the inventory service answers 404, which falls back.
        let unknown = system.catalog_client.find_enriched_product(code("P003")).await.unwrap().unwrap();
        assert!(unknown.in_stock);

        system.inventory_store_client.set_quantity(code("P002"), 3).await.unwrap();
        let restocked = system.catalog_client.find_enriched_product(code("P002")).await.unwrap().unwrap();
        assert!(restocked.in_stock);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_outage_marks_products_in_stock_without_writing_back() {
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Unreachable));
        let system = CatalogSystem::with_endpoint(&config(5), endpoint.clone());
        seed_product(&system, "P001").await;

        let enriched = system.catalog_client.find_enriched_product(code("P001")).await.unwrap().unwrap();
        assert!(enriched.in_stock);
        assert_eq!(endpoint.calls(), 1);

        let stored = system.product_client.find_by_code(code("P001")).await.unwrap().unwrap();
        assert!(!stored.in_stock);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_catalog_updates_do_not_touch_stock_flag() {
        let system = CatalogSystem::new(&config(5)).unwrap();
        seed_product(&system, "P001").await;
        seed_stock(&system, "P001", 2).await;

        let patch = ProductPatch { price: Some(12.0), ..ProductPatch::default() };
        let updated = system.product_client.update_product(code("P001"), patch).await.unwrap();
        assert_eq!(updated.price, 12.0);
        assert!(!updated.in_stock);

        let enriched = system.catalog_client.find_enriched_product(code("P001")).await.unwrap().unwrap();
        assert_eq!(enriched.price, 12.0);
        assert!(enriched.in_stock);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_inventory_body_leaves_flag_unset() {
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Empty));
        let system = CatalogSystem::with_endpoint(&config(5), endpoint.clone());
        seed_product(&system, "P001").await;

        let product = system.catalog_client.find_enriched_product(code("P001")).await.unwrap().unwrap();
        assert!(!product.in_stock);
        assert_eq!(endpoint.calls(), 1);

        system.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_circuit_opens_and_recovers_through_catalog() {
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Status(503)));
        let system = CatalogSystem::with_endpoint(&config(3), endpoint.clone());
        seed_product(&system, "P001").await;
        let breaker = system.breakers.get("inventory-by-productcode").unwrap();

        for _ in 0..6 {
            let product = system.catalog_client.find_enriched_product(code("P001")).await.unwrap().unwrap();
            assert!(product.in_stock);
        }
        assert_eq!(breaker.state(), CircuitState::Open);
        assert_eq!(endpoint.calls(), 3);

        endpoint.respond_with(FakeResponse::Quantity(0));
        tokio::time::advance(Duration::from_secs(5)).await;

        let probed = system.catalog_client.find_enriched_product(code("P001")).await.unwrap().unwrap();
        assert!(!probed.in_stock);
        assert_eq!(endpoint.calls(), 4);
        assert_eq!(breaker.state(), CircuitState::Closed);

        system.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_enrichment_aborts_inventory_call() {
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Delayed(Duration::from_secs(10), 7)));
        let mut config = config(1);
        config.inventory.request_timeout_ms = 60_000;
        let system = CatalogSystem::with_endpoint(&config, endpoint.clone());
        seed_product(&system, "P001").await;

        let cancelled = tokio::time::timeout(
            Duration::from_millis(50),
            system.catalog_client.find_enriched_product(code("P001")),
        )
        .await;
        assert!(cancelled.is_err());
        assert_eq!(endpoint.calls(), 1);

        // Cancellation is not a remote failure.
        let metrics = system.breakers.get("inventory-by-productcode").unwrap().metrics();
        assert_eq!(metrics.failures, 0);
        assert_eq!(metrics.successes, 0);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_product_store_outage_is_reported() {
        let (product_inner, product_rx) = create_mock_client::<Product>(1);
        drop(product_rx);
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Quantity(1)));
        let breaker = Arc::new(CircuitBreaker::new("inventory-by-productcode", Default::default()));
        let catalog_client = CatalogClient::new(
            ProductClient::new(product_inner),
            ResilientInventoryClient::new(endpoint.clone(), breaker, Duration::from_millis(200)),
        );

        let result = catalog_client.find_enriched_product(code("P001")).await;
        assert!(matches!(
            result,
            Err(CatalogError::ProductStore(ProductError::ActorCommunicationError(_)))
        ));
        assert_eq!(endpoint.calls(), 0);
    }

    #[tokio::test]
    async fn test_find_all_products_is_not_enriched() {
        let endpoint = Arc::new(FakeInventoryEndpoint::new(FakeResponse::Quantity(FALLBACK_AVAILABLE_QUANTITY)));
        let system = CatalogSystem::with_endpoint(&config(5), endpoint.clone());
        seed_product(&system, "P002").await;
        seed_product(&system, "P001").await;

        let products = system.catalog_client.find_all_products().await.unwrap();
        let codes: Vec<_> = products.iter().map(|p| p.code.as_str().to_string()).collect();
        assert_eq!(codes, vec!["P001", "P002"]);
        assert!(products.iter().all(|p| !p.in_stock));
        assert_eq!(endpoint.calls(), 0);

        system.shutdown().await.unwrap();
    }
}
