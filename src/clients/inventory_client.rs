use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use crate::clients::{EndpointError, InventoryEndpoint};
use crate::domain::{InventoryLevel, ProductCode};
use crate::resilience::{CircuitBreaker, Rejection};

/// Quantity reported for any product while the inventory service cannot be
/// reached. Non-zero so an outage shows products as available rather than
/// sold out; this is a business policy, not a measured value.
pub const FALLBACK_AVAILABLE_QUANTITY: u32 = 50;

/// Why a lookup fell back to the default level.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupFailure {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Rejected(Rejection),
}

/// Inventory lookups that never fail: remote errors, timeouts and an open
/// circuit all turn into [`FALLBACK_AVAILABLE_QUANTITY`].
#[derive(Clone)]
pub struct ResilientInventoryClient {
    endpoint: Arc<dyn InventoryEndpoint>,
    breaker: Arc<CircuitBreaker>,
    request_timeout: Duration,
}

impl ResilientInventoryClient {
    pub fn new(
        endpoint: Arc<dyn InventoryEndpoint>,
        breaker: Arc<CircuitBreaker>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            endpoint,
            breaker,
            request_timeout,
        }
    }

    #[cfg(test)]
    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Stock level for `code`.
    ///
    /// `None` only when the service answered successfully without a body.
    /// Dropping the returned future aborts the in-flight request.
    #[instrument(skip(self), fields(command = %self.breaker.name()))]
    pub async fn lookup(&self, code: &ProductCode) -> Option<InventoryLevel> {
        match self.try_lookup(code).await {
            Ok(level) => level,
            Err(failure) => Some(self.fallback(code, &failure)),
        }
    }

    async fn try_lookup(&self, code: &ProductCode) -> Result<Option<InventoryLevel>, LookupFailure> {
        let permit = self.breaker.try_acquire().map_err(LookupFailure::Rejected)?;

        let outcome = match tokio::time::timeout(self.request_timeout, self.endpoint.fetch_level(code)).await {
            Ok(Ok(level)) => Ok(level),
            Ok(Err(e)) => Err(LookupFailure::Endpoint(e)),
            Err(_) => Err(LookupFailure::Timeout(self.request_timeout)),
        };

        match &outcome {
            Ok(_) => permit.record_success(),
            Err(cause) => {
                warn!(
                    product_code = %code,
                    command = %self.breaker.name(),
                    probe = permit.is_probe(),
                    %cause,
                    "Unable to get inventory level"
                );
                permit.record_failure();
            }
        }
        outcome
    }

    fn fallback(&self, code: &ProductCode, cause: &LookupFailure) -> InventoryLevel {
        info!(
            product_code = %code,
            command = %self.breaker.name(),
            %cause,
            available_quantity = FALLBACK_AVAILABLE_QUANTITY,
            "Returning default inventory level"
        );
        InventoryLevel::new(code.clone(), FALLBACK_AVAILABLE_QUANTITY)
    }
}
