//! Circuit breaker guarding calls to a remote dependency.
//!
//! Three states:
//! - Closed: calls pass through, consecutive failures are counted
//! - Open: calls are rejected until the cooldown has elapsed
//! - HalfOpen: exactly one probe call is let through to test recovery
//!
//! All bookkeeping happens under one mutex that is never held across an
//! `.await`. Callers take a [`CallPermit`] before the remote call and settle it
//! with the outcome afterwards.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Current state of the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitState {
    /// Calls proceed normally
    Closed,
    /// Calls are short-circuited without touching the dependency
    Open,
    /// A single probe call is allowed to test recovery
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => f.write_str("closed"),
            CircuitState::Open => f.write_str("open"),
            CircuitState::HalfOpen => f.write_str("half-open"),
        }
    }
}

/// Configuration for circuit breaker behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that trip a closed circuit
    pub failure_threshold: u32,
    /// Time an open circuit waits before allowing a probe
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(5),
        }
    }
}

impl CircuitBreakerConfig {
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

/// Why a call was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The circuit is open and the cooldown has not elapsed
    CircuitOpen,
    /// The circuit is half-open and its probe is still running
    ProbeInFlight,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::CircuitOpen => f.write_str("circuit open"),
            Rejection::ProbeInFlight => f.write_str("half-open probe in flight"),
        }
    }
}

/// Counters describing what the breaker has seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircuitBreakerMetrics {
    pub admitted: u64,
    pub successes: u64,
    pub failures: u64,
    pub rejected: u64,
    pub trips: u64,
    pub consecutive_failures: u32,
}

#[derive(Debug)]
struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    probe_in_flight: bool,
    /// Bumped on every transition; results from an older generation are stale
    generation: u64,
    metrics: CircuitBreakerMetrics,
}

impl BreakerState {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at: None,
            probe_in_flight: false,
            generation: 0,
            metrics: CircuitBreakerMetrics::default(),
        }
    }

    fn transition(&mut self, name: &str, to: CircuitState) {
        let from = self.state;
        self.state = to;
        self.generation += 1;
        self.probe_in_flight = false;
        match to {
            CircuitState::Open => {
                self.opened_at = Some(Instant::now());
                self.consecutive_failures = 0;
                self.metrics.trips += 1;
                warn!(command = %name, %from, to = %to, "Circuit opened");
            }
            CircuitState::HalfOpen => {
                info!(command = %name, %from, to = %to, "Circuit half-open, probing");
            }
            CircuitState::Closed => {
                self.opened_at = None;
                self.consecutive_failures = 0;
                info!(command = %name, %from, to = %to, "Circuit closed");
            }
        }
    }
}

/// Process-local circuit breaker for one remote command.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        debug!(
            command = %name,
            failure_threshold = config.failure_threshold,
            cooldown = ?config.cooldown,
            "Circuit breaker initialized"
        );
        Self {
            name,
            config,
            inner: Mutex::new(BreakerState::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, BreakerState> {
        // A panic elsewhere cannot leave the counters half-written; keep serving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state. An open circuit whose cooldown has elapsed still reports
    /// `Open` until the next call claims the probe.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.lock();
        CircuitBreakerMetrics {
            consecutive_failures: inner.consecutive_failures,
            ..inner.metrics
        }
    }

    /// Force the circuit back to closed with cleared counters.
    #[cfg(test)]
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.transition(&self.name, CircuitState::Closed);
    }

    /// Ask to make a call. On admission the caller must settle the permit with
    /// the outcome; dropping it unsettled counts as a cancelled call.
    pub fn try_acquire(&self) -> Result<CallPermit<'_>, Rejection> {
        let mut inner = self.lock();
        let probe = match inner.state {
            CircuitState::Closed => false,
            CircuitState::Open => {
                let cooled = inner
                    .opened_at
                    .map_or(true, |at| at.elapsed() >= self.config.cooldown);
                if !cooled {
                    inner.metrics.rejected += 1;
                    return Err(Rejection::CircuitOpen);
                }
                inner.transition(&self.name, CircuitState::HalfOpen);
                true
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    inner.metrics.rejected += 1;
                    return Err(Rejection::ProbeInFlight);
                }
                true
            }
        };
        if probe {
            inner.probe_in_flight = true;
        }
        inner.metrics.admitted += 1;
        Ok(CallPermit {
            breaker: self,
            generation: inner.generation,
            probe,
            settled: false,
        })
    }

    fn settle(&self, generation: u64, probe: bool, success: bool) {
        let mut inner = self.lock();
        if success {
            inner.metrics.successes += 1;
        } else {
            inner.metrics.failures += 1;
        }
        if inner.generation != generation {
            debug!(command = %self.name, success, "Ignoring stale call result");
            return;
        }
        match (inner.state, success) {
            (CircuitState::Closed, true) => inner.consecutive_failures = 0,
            (CircuitState::Closed, false) => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    inner.transition(&self.name, CircuitState::Open);
                }
            }
            (CircuitState::HalfOpen, true) if probe => {
                inner.transition(&self.name, CircuitState::Closed);
            }
            (CircuitState::HalfOpen, false) if probe => {
                inner.transition(&self.name, CircuitState::Open);
            }
            _ => {}
        }
    }

    fn abandon(&self, generation: u64, probe: bool) {
        let mut inner = self.lock();
        if probe && inner.generation == generation && inner.state == CircuitState::HalfOpen {
            debug!(command = %self.name, "Probe cancelled, releasing slot");
            inner.probe_in_flight = false;
        }
    }
}

/// Admission ticket for one call through a [`CircuitBreaker`].
#[must_use = "settle the permit with record_success or record_failure"]
#[derive(Debug)]
pub struct CallPermit<'a> {
    breaker: &'a CircuitBreaker,
    generation: u64,
    probe: bool,
    settled: bool,
}

impl CallPermit<'_> {
    /// True when this call is the half-open recovery probe.
    pub fn is_probe(&self) -> bool {
        self.probe
    }

    pub fn record_success(mut self) {
        self.settled = true;
        self.breaker.settle(self.generation, self.probe, true);
    }

    pub fn record_failure(mut self) {
        self.settled = true;
        self.breaker.settle(self.generation, self.probe, false);
    }
}

impl Drop for CallPermit<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.abandon(self.generation, self.probe);
        }
    }
}
