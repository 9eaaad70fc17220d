//! Deferred invocation queue and flush machinery.
//!
//! `enqueue` records "a request will happen" without matching anything;
//! `flush` drains every invocation queued before it started, either serially
//! (one result resolves before the next invocation begins) or as one
//! concurrent batch. The flush future is shared: while a drain is
//! outstanding, every `flush` call observes the same operation, so queued
//! invocations can never run twice.
//!
//! All matching is synchronous CPU work; the concurrency here is concurrency
//! of pending results on one cooperative scheduler, not of threads. Lock
//! guards are never held across await points.

use crate::descriptor::{RequestDescriptor, ResponseDescriptor};
use crate::engine::Engine;
use crate::error::ErsatzError;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// How a flush drains the invocation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
    /// One invocation's result resolves before the next starts; the first
    /// failure aborts the drain and the remainder is never executed.
    #[default]
    Serial,
    /// All queued invocations run as one batch; the flush succeeds only if
    /// every invocation succeeds, and otherwise fails with the first failure
    /// in queue order. Every invocation runs even when one fails.
    Concurrent,
}

type InvocationResult = Result<ResponseDescriptor, ErsatzError>;

/// The shared outcome of a flush; awaiting it any number of times observes
/// the same drain.
pub type FlushFuture = Shared<BoxFuture<'static, Result<(), ErsatzError>>>;

/// Result handle returned by `enqueue`: resolves to the matched response (or
/// the match failure) once a flush reaches the queued invocation.
pub struct PendingResponse {
    rx: oneshot::Receiver<InvocationResult>,
}

impl Future for PendingResponse {
    type Output = InvocationResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            // Sender dropped without delivering: the invocation was skipped.
            Err(_) => Err(ErsatzError::NeverInvoked),
        })
    }
}

struct QueuedInvocation {
    request: RequestDescriptor,
    reply: oneshot::Sender<InvocationResult>,
}

#[derive(Default)]
struct State {
    queue: Vec<QueuedInvocation>,
    flushing: Option<FlushFuture>,
    flushed: bool,
}

/// Owns the invocation queue for one engine instance.
pub struct Scheduler {
    engine: Arc<Mutex<Engine>>,
    state: Arc<Mutex<State>>,
    mode: FlushMode,
}

impl Scheduler {
    pub fn new(engine: Arc<Mutex<Engine>>, mode: FlushMode) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(State::default())),
            mode,
        }
    }

    /// Append a deferred invocation and hand back its result immediately.
    /// No matching happens until a flush.
    pub fn enqueue(&self, request: RequestDescriptor) -> PendingResponse {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        if state.flushing.is_some() {
            // Invariant: items are appended only before a flush begins.
            warn!(
                url = request.url.as_deref().unwrap_or_default(),
                "invocation enqueued after flush started; it will not be drained"
            );
        }
        state.queue.push(QueuedInvocation { request, reply: tx });
        PendingResponse { rx }
    }

    /// Drain every invocation queued so far.
    ///
    /// Idempotent: once a drain has started, subsequent calls return the same
    /// shared operation instead of starting a second one.
    pub fn flush(&self) -> FlushFuture {
        let mut state = self.state.lock();
        if let Some(flushing) = &state.flushing {
            return flushing.clone();
        }

        let queue = std::mem::take(&mut state.queue);
        debug!(queued = queue.len(), mode = ?self.mode, "flushing invocation queue");
        let engine = Arc::clone(&self.engine);
        let shared_state = Arc::clone(&self.state);
        let mode = self.mode;

        let flushing: FlushFuture = async move {
            let outcome = match mode {
                FlushMode::Serial => drain_serial(&engine, queue).await,
                FlushMode::Concurrent => drain_concurrent(&engine, queue).await,
            };
            shared_state.lock().flushed = true;
            outcome
        }
        .boxed()
        .shared();

        state.flushing = Some(flushing.clone());
        flushing
    }

    /// Whether a flush has run to completion.
    pub fn is_flushed(&self) -> bool {
        self.state.lock().flushed
    }

    /// Whether invocations remain queued (or a drain is still in flight).
    pub fn has_undrained_invocations(&self) -> bool {
        let state = self.state.lock();
        !state.queue.is_empty() || (state.flushing.is_some() && !state.flushed)
    }

    /// Fail when queued invocations have not been drained yet; verification
    /// is meaningless before then.
    pub fn verify_flushed(&self) -> Result<(), ErsatzError> {
        if self.has_undrained_invocations() {
            return Err(ErsatzError::NotFlushed);
        }
        Ok(())
    }
}

/// Hand a result to its caller. A failure whose handle is already gone is
/// logged rather than silently dropped; the test may have concluded its
/// assertions by then.
fn deliver(reply: oneshot::Sender<InvocationResult>, result: InvocationResult) {
    if let Err(unclaimed) = reply.send(result) {
        if let Err(err) = unclaimed {
            error!(error = %err, "deferred invocation failed after its handle was dropped");
        }
    }
}

async fn drain_serial(
    engine: &Mutex<Engine>,
    queue: Vec<QueuedInvocation>,
) -> Result<(), ErsatzError> {
    let mut items = queue.into_iter();
    while let Some(item) = items.next() {
        let result = engine.lock().invoke(&item.request);
        let failure = result.as_ref().err().cloned();
        deliver(item.reply, result);
        if let Some(err) = failure {
            // Remaining items are never executed; their handles resolve to
            // NeverInvoked when the senders drop here.
            drop(items);
            return Err(err);
        }
        tokio::task::yield_now().await;
    }
    Ok(())
}

async fn drain_concurrent(
    engine: &Arc<Mutex<Engine>>,
    queue: Vec<QueuedInvocation>,
) -> Result<(), ErsatzError> {
    let invocations = queue.into_iter().map(|item| {
        let engine = Arc::clone(engine);
        async move {
            let result = engine.lock().invoke(&item.request);
            let failure = result.as_ref().err().cloned();
            deliver(item.reply, result);
            match failure {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    });
    let outcomes = futures::future::join_all(invocations).await;
    outcomes.into_iter().find_map(Result::err).map_or(Ok(()), Err)
}
