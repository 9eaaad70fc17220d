//! Expectation registry and invocation orchestration.
//!
//! The engine owns an ordered registry of expectations and consumes it under
//! one of two ordering policies:
//!
//! - **strict** (default): the Nth invocation is checked against the Nth
//!   registered expectation, whether or not it matches. Ordering is a hard
//!   constraint, not a best-effort search.
//! - **non-strict**: the registry is searched in registration order for the
//!   first expectation the request satisfies; a matched expectation stays
//!   registered and can serve repeated requests until verification.
//!
//! Registry state is per-instance; two engines never share expectations.

use crate::descriptor::{RequestDescriptor, ResponseDescriptor};
use crate::error::ErsatzError;
use crate::expectation::Expectation;
use std::collections::VecDeque;
use tracing::debug;

const BULLET: &str = "\u{25B8} ";

/// Ordering and verification policy for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Consume expectations positionally, in registration order.
    pub strict_order: bool,
    /// Whether `verify` is allowed on this instance.
    pub verifiable: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_order: true,
            verifiable: true,
        }
    }
}

/// Handle returned by `register`; identifies an expectation in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationId(pub usize);

/// Registry of outstanding expectations plus the invocation logic.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    registry: VecDeque<Expectation>,
    registered: usize,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: VecDeque::new(),
            registered: 0,
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Build an expectation and append it to the registry tail.
    ///
    /// A malformed descriptor fails here and leaves the registry untouched.
    pub fn register(
        &mut self,
        request: RequestDescriptor,
        response: ResponseDescriptor,
    ) -> Result<ExpectationId, ErsatzError> {
        let expectation = Expectation::new(request, response)?;
        debug!(
            method = expectation.request().method.as_deref().unwrap_or_default(),
            url = expectation.request().url.as_deref().unwrap_or_default(),
            "registered expectation"
        );
        self.registry.push_back(expectation);
        let id = ExpectationId(self.registered);
        self.registered += 1;
        Ok(id)
    }

    /// Match one actual request against the registry under the configured
    /// ordering policy, returning the paired response on success.
    pub fn invoke(
        &mut self,
        actual: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, ErsatzError> {
        if self.config.strict_order {
            self.invoke_positional(actual)
        } else {
            self.invoke_search(actual)
        }
    }

    /// Strict policy: the head of the registry is consumed unconditionally.
    /// A mismatch is reported against the positional expectation, even if a
    /// later expectation would have matched.
    fn invoke_positional(
        &mut self,
        actual: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, ErsatzError> {
        let Some(mut expectation) = self.registry.pop_front() else {
            return Err(ErsatzError::UnexpectedRequest {
                request: serialize_request(actual),
            });
        };
        match expectation.matches(actual) {
            Ok(()) => {
                expectation.mark_satisfied();
                debug!(url = actual.url.as_deref().unwrap_or_default(), "matched expectation");
                Ok(expectation.response().clone())
            }
            Err(ErsatzError::Mismatch { failures }) => Err(ErsatzError::OutOfOrder { failures }),
            Err(other) => Err(other),
        }
    }

    /// Non-strict policy: first passing expectation in registration order
    /// wins; it stays registered with an incremented count.
    fn invoke_search(
        &mut self,
        actual: &RequestDescriptor,
    ) -> Result<ResponseDescriptor, ErsatzError> {
        if self.registry.is_empty() {
            return Err(ErsatzError::NoExpectations);
        }
        for expectation in self.registry.iter_mut() {
            if expectation.matches(actual).is_ok() {
                expectation.mark_satisfied();
                debug!(
                    url = actual.url.as_deref().unwrap_or_default(),
                    count = expectation.request_count(),
                    "matched expectation"
                );
                return Ok(expectation.response().clone());
            }
        }
        Err(ErsatzError::UnexpectedRequest {
            request: serialize_request(actual),
        })
    }

    /// Expectations never successfully matched.
    pub fn pending(&self) -> Vec<&Expectation> {
        self.registry.iter().filter(|e| e.is_pending()).collect()
    }

    /// Assert that no expectations remain pending.
    pub fn verify(&self) -> Result<(), ErsatzError> {
        if !self.config.verifiable {
            return Err(ErsatzError::NotVerifiable);
        }
        let pending = self.pending();
        if pending.is_empty() {
            return Ok(());
        }
        Err(ErsatzError::PendingExpectations {
            count: pending.len(),
            listing: render_listing(&pending, !self.config.strict_order),
        })
    }

    /// Bullet-point rendering of all remaining expectations, for diagnostics.
    pub fn describe_all(&self) -> String {
        let remaining: Vec<&Expectation> = self.registry.iter().collect();
        render_listing(&remaining, !self.config.strict_order)
    }
}

fn render_listing(expectations: &[&Expectation], with_counts: bool) -> String {
    expectations
        .iter()
        .map(|e| {
            let description = if with_counts {
                e.describe_with_count()
            } else {
                e.describe()
            };
            format!("{BULLET}{description}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn serialize_request(request: &RequestDescriptor) -> String {
    serde_json::to_string(request).unwrap_or_else(|_| format!("{request:?}"))
}
