//! Fault isolation for calls to remote services.

pub mod circuit_breaker;

pub use circuit_breaker::*;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Hands out one shared breaker per command key, so every client calling the
/// same remote command trips and recovers together.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    breakers: Mutex<HashMap<String, Arc<CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the breaker for `command`, creating it with `config` on first use.
    /// Later calls keep the configuration the breaker was created with.
    pub fn get_or_create(&self, command: &str, config: CircuitBreakerConfig) -> Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock().unwrap_or_else(PoisonError::into_inner);
        breakers
            .entry(command.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(command, config)))
            .clone()
    }

    pub fn get(&self, command: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(command)
            .cloned()
    }
}
