//! The public stub-engine surface.
//!
//! One `Ersatz` instance owns one registry and one invocation queue. It
//! offers both invocation contracts: immediate synchronous `invoke`, and the
//! deferred `enqueue`/`flush` pair. Which one a harness uses is a matter of
//! how the code under test calls out, not of engine state.

use crate::descriptor::{RequestDescriptor, ResponseDescriptor};
use crate::engine::{Engine, EngineConfig, ExpectationId};
use crate::error::ErsatzError;
use crate::scheduler::{FlushFuture, FlushMode, PendingResponse, Scheduler};
use parking_lot::Mutex;
use std::sync::Arc;

/// Construction-time configuration for one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErsatzConfig {
    pub engine: EngineConfig,
    pub flush_mode: FlushMode,
}

impl ErsatzConfig {
    pub fn strict_order(mut self, strict_order: bool) -> Self {
        self.engine.strict_order = strict_order;
        self
    }

    pub fn verifiable(mut self, verifiable: bool) -> Self {
        self.engine.verifiable = verifiable;
        self
    }

    pub fn flush_mode(mut self, flush_mode: FlushMode) -> Self {
        self.flush_mode = flush_mode;
        self
    }
}

/// In-process HTTP stub engine: register expectations, drive requests
/// against them, verify that all of them were consumed.
pub struct Ersatz {
    engine: Arc<Mutex<Engine>>,
    scheduler: Scheduler,
}

impl Default for Ersatz {
    fn default() -> Self {
        Self::new()
    }
}

impl Ersatz {
    /// Strict-order, verifiable instance with a serial flush.
    pub fn new() -> Self {
        Self::with_config(ErsatzConfig::default())
    }

    pub fn with_config(config: ErsatzConfig) -> Self {
        let engine = Arc::new(Mutex::new(Engine::new(config.engine)));
        let scheduler = Scheduler::new(Arc::clone(&engine), config.flush_mode);
        Self { engine, scheduler }
    }

    /// Register an expected request and the response to answer it with.
    pub fn expect(
        &self,
        request: RequestDescriptor,
        response: ResponseDescriptor,
    ) -> Result<ExpectationId, ErsatzError> {
        self.engine.lock().register(request, response)
    }

    /// Immediately match one actual request against the registry.
    pub fn invoke(&self, request: &RequestDescriptor) -> Result<ResponseDescriptor, ErsatzError> {
        self.engine.lock().invoke(request)
    }

    /// Defer an invocation until the next `flush`.
    pub fn enqueue(&self, request: RequestDescriptor) -> PendingResponse {
        self.scheduler.enqueue(request)
    }

    /// Drain all queued invocations. Awaiting the returned future any number
    /// of times, from any number of callers, observes one drain.
    pub fn flush(&self) -> FlushFuture {
        self.scheduler.flush()
    }

    /// Assert that nothing remains outstanding: the instance is verifiable,
    /// queued invocations have been flushed, and no expectation is pending.
    pub fn verify(&self) -> Result<(), ErsatzError> {
        if !self.engine.lock().config().verifiable {
            return Err(ErsatzError::NotVerifiable);
        }
        self.scheduler.verify_flushed()?;
        self.engine.lock().verify()
    }

    /// Number of expectations never successfully matched.
    pub fn pending_count(&self) -> usize {
        self.engine.lock().pending().len()
    }

    /// Whether a flush has run to completion.
    pub fn is_flushed(&self) -> bool {
        self.scheduler.is_flushed()
    }

    /// Bullet-point rendering of all remaining expectations. Diagnostics
    /// only, not for programmatic consumption.
    pub fn describe_all(&self) -> String {
        self.engine.lock().describe_all()
    }
}
