use std::sync::Arc;
use std::time::Duration;

use failsafe::backoff::Exponential;
use failsafe::failure_policy::{consecutive_failures, ConsecutiveFailures};
use failsafe::futures::CircuitBreaker;
pub use failsafe::FailurePredicate;
use failsafe::{backoff, Config, StateMachine};
use futures_core::TryFuture;
use serde::{Deserialize, Serialize};

pub type Error<E> = failsafe::Error<E>;
type FailurePolicy = ConsecutiveFailures<Exponential>;

/// Circuit breaker settings applied to every endpoint of a [`WithFallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerConfiguration {
    /// Consecutive failures after which the endpoint is opened
    pub max_failures: u32,

    /// Back-off bounds in seconds while the endpoint is open
    pub min_backoff: u64,
    pub max_backoff: u64,
}

impl Default for BreakerConfiguration {
    fn default() -> Self {
        Self {
            max_failures: 3,
            min_backoff: 10,
            max_backoff: 60,
        }
    }
}

struct Endpoint<T> {
    value: Arc<T>,
    state_machine: StateMachine<FailurePolicy, ()>,
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            state_machine: self.state_machine.clone(),
        }
    }
}

impl<E, T: FailurePredicate<E>> FailurePredicate<E> for &Endpoint<T> {
    fn is_err(&self, err: &E) -> bool {
        self.value.is_err(err)
    }
}

impl<T> Endpoint<T> {
    fn new(value: T, configuration: &BreakerConfiguration) -> Self {
        let backoff = backoff::exponential(
            Duration::from_secs(configuration.min_backoff),
            Duration::from_secs(configuration.max_backoff),
        );

        Self {
            value: value.into(),
            state_machine: Config::new()
                .failure_policy(consecutive_failures(configuration.max_failures, backoff))
                .build(),
        }
    }

    async fn call<F>(&self, f: impl FnOnce(Arc<T>) -> F) -> Result<F::Ok, Error<F::Error>>
    where
        F: TryFuture,
        T: FailurePredicate<F::Error>,
    {
        self.state_machine.call_with(self, f(self.value.clone())).await
    }

    fn is_call_permitted(&self) -> bool {
        self.state_machine.is_call_permitted()
    }
}

/// An ordered list of interchangeable endpoints, each guarded by its own
/// circuit breaker. The first endpoint is the primary one.
#[derive(Clone)]
pub struct WithFallback<T> {
    configuration: BreakerConfiguration,
    endpoints: Vec<Endpoint<T>>,
}

impl<T> Default for WithFallback<T> {
    fn default() -> Self {
        Self::new(BreakerConfiguration::default())
    }
}

impl<T> WithFallback<T> {
    pub fn new(configuration: BreakerConfiguration) -> Self {
        Self {
            configuration,
            endpoints: vec![],
        }
    }

    pub fn with(mut self, alternative: T) -> Self {
        self.endpoints.push(Endpoint::new(alternative, &self.configuration));
        self
    }

    /// Executes `f` against the endpoints in order until one succeeds.
    ///
    /// Endpoints whose breaker is open are skipped. An error that the endpoint
    /// does not classify as a failure (see [`FailurePredicate`]) is returned
    /// immediately since another endpoint would answer the same. When every
    /// permitted endpoint failed, the last error is returned, and
    /// [`Error::Rejected`] is returned when no endpoint was permitted at all.
    pub async fn call<F>(&self, f: impl Fn(Arc<T>) -> F) -> Result<F::Ok, Error<F::Error>>
    where
        F: TryFuture,
        T: FailurePredicate<F::Error>,
    {
        let mut last_error = None;
        for endpoint in self.endpoints.iter() {
            if !endpoint.is_call_permitted() {
                continue;
            }

            match endpoint.call(&f).await {
                Ok(value) => return Ok(value),
                Err(Error::Inner(e)) if !endpoint.value.is_err(&e) => return Err(Error::Inner(e)),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(Error::Rejected))
    }
}
