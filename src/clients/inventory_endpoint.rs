use std::time::Duration;
use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, instrument};
use crate::clients::InventoryStoreClient;
use crate::domain::{InventoryLevel, ProductCode};

/// Ways a single call to the inventory service can fail.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EndpointError {
    #[error("invalid base url {0}")]
    InvalidBaseUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A source of stock levels keyed by product code.
///
/// `Ok(None)` means the service answered successfully but had no body for the
/// code; every failure is an `Err`.
#[async_trait]
pub trait InventoryEndpoint: Send + Sync {
    async fn fetch_level(&self, code: &ProductCode) -> Result<Option<InventoryLevel>, EndpointError>;
}

/// Calls `GET {base_url}/api/inventory/{code}` on a remote inventory service.
///
/// The code is sent as a single escaped path segment, and a body naming any
/// other product is rejected.
#[derive(Clone)]
pub struct HttpInventoryEndpoint {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpInventoryEndpoint {
    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Result<Self, EndpointError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| EndpointError::Transport(e.to_string()))?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, EndpointError> {
        let base_url = Url::parse(base_url).map_err(|e| EndpointError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(EndpointError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    fn level_url(&self, code: &ProductCode) -> Result<Url, EndpointError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EndpointError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "inventory"])
            .push(code.as_str());
        Ok(url)
    }
}

#[async_trait]
impl InventoryEndpoint for HttpInventoryEndpoint {
    #[instrument(skip(self))]
    async fn fetch_level(&self, code: &ProductCode) -> Result<Option<InventoryLevel>, EndpointError> {
        let url = self.level_url(code)?;
        debug!(%url, "Requesting inventory level");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| EndpointError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| EndpointError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Received inventory response");
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let level = serde_json::from_slice::<Option<InventoryLevel>>(&body)
            .map_err(|e| EndpointError::Decode(e.to_string()))?;
        match level {
            Some(level) if level.product_code != *code => Err(EndpointError::Decode(format!(
                "level for {} returned for {}",
                level.product_code, code
            ))),
            level => Ok(level),
        }
    }
}

/// Reads levels straight from an in-process inventory store.
#[derive(Clone)]
pub struct LocalInventoryEndpoint {
    store: InventoryStoreClient,
}

impl LocalInventoryEndpoint {
    pub fn new(store: InventoryStoreClient) -> Self {
        Self { store }
    }
}

#[async_trait]
impl InventoryEndpoint for LocalInventoryEndpoint {
    async fn fetch_level(&self, code: &ProductCode) -> Result<Option<InventoryLevel>, EndpointError> {
        match self.store.find_by_product_code(code.clone()).await {
            Ok(Some(item)) => {
                debug!(item_id = %item.id, "Stock row found");
                Ok(Some(item.level()))
            }
            // The inventory service answers 404 for unknown codes.
            Ok(None) => Err(EndpointError::Status(404)),
            Err(e) => Err(EndpointError::Transport(e.to_string())),
        }
    }
}
