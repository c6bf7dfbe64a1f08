//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a store client and the receiver behind it,
//! then answer requests with [`expect_get`] / [`expect_list`]. Use
//! [`FakeInventoryEndpoint`] in place of the remote inventory service.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use crate::actor_framework::{FrameworkError, Record, StoreClient, StoreRequest};
use crate::clients::{EndpointError, InventoryEndpoint};
use crate::domain::{InventoryLevel, ProductCode};

/// Creates a mock store client and a receiver for asserting requests.
///
/// Tests for clients that sit on top of a store (e.g. `CatalogClient`) do not
/// need a running `StoreActor`: the test plays the actor by reading the
/// receiver and answering on the embedded oneshot channel.
pub fn create_mock_client<T: Record>(buffer_size: usize) -> (StoreClient<T>, mpsc::Receiver<StoreRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Record>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<(T::Key, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { key, respond_to }) => Some((key, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Record>(
    receiver: &mut mpsc::Receiver<StoreRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(StoreRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// What the fake inventory service answers with.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Quantity(u32),
    /// Success status without a body
    Empty,
    Status(u16),
    Unreachable,
    /// Answers with the quantity after sleeping
    Delayed(Duration, u32),
}

/// Test double for the remote inventory service that counts every call.
#[derive(Debug)]
pub struct FakeInventoryEndpoint {
    response: Mutex<FakeResponse>,
    calls: AtomicUsize,
}

impl FakeInventoryEndpoint {
    pub fn new(response: FakeResponse) -> Self {
        Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond_with(&self, response: FakeResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryEndpoint for FakeInventoryEndpoint {
    async fn fetch_level(&self, code: &ProductCode) -> Result<Option<InventoryLevel>, EndpointError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().unwrap().clone();
        match response {
            FakeResponse::Quantity(quantity) => Ok(Some(InventoryLevel::new(code.clone(), quantity))),
            FakeResponse::Empty => Ok(None),
            FakeResponse::Status(status) => Err(EndpointError::Status(status)),
            FakeResponse::Unreachable => Err(EndpointError::Transport("connection refused".to_string())),
            FakeResponse::Delayed(delay, quantity) => {
                tokio::time::sleep(delay).await;
                Ok(Some(InventoryLevel::new(code.clone(), quantity)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let code = ProductCode::new("P100").unwrap();

        let lookup = tokio::spawn({
            let code = code.clone();
            async move { client.get(code).await }
        });

        let (key, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(key, code);
        responder.send(Ok(None)).unwrap();

        assert_eq!(lookup.await.unwrap(), Ok(None));
    }

    #[tokio::test]
    async fn test_mock_list() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let listing = tokio::spawn(async move { client.list().await });

        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        responder.send(Err(FrameworkError::ActorDropped)).unwrap();

        assert_eq!(listing.await.unwrap(), Err(FrameworkError::ActorDropped));
    }

    #[tokio::test]
    async fn test_fake_endpoint_counts_calls() {
        let endpoint = FakeInventoryEndpoint::new(FakeResponse::Quantity(3));
        let code = ProductCode::new("P1").unwrap();

        assert_eq!(endpoint.fetch_level(&code).await, Ok(Some(InventoryLevel::new(code.clone(), 3))));
        endpoint.respond_with(FakeResponse::Status(502));
        assert_eq!(endpoint.fetch_level(&code).await, Err(EndpointError::Status(502)));
        assert_eq!(endpoint.calls(), 2);
    }
}
