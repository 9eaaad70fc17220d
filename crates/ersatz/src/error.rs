//! Error types for the stub engine.
//!
//! Every failure message is self-sufficient prose naming the expected and
//! actual values, suitable for direct display in a test failure report.

use thiserror::Error;

/// All the ways an expectation, invocation, or verification can fail.
///
/// `Clone` so a shared flush outcome can be handed to every caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErsatzError {
    /// An expectation was built from a descriptor with no URL.
    #[error("url is required for expectation")]
    MissingUrl,

    /// An expectation was built from a descriptor with no method.
    #[error("method is required for expectation")]
    MissingMethod,

    /// One invocation failed one or more sub-matchers; carries every
    /// contributing message, not just the first.
    #[error("{}", .failures.join("\n"))]
    Mismatch { failures: Vec<String> },

    /// Strict-mode positional mismatch: the invocation was checked against
    /// the next registered expectation and did not satisfy it, even if a
    /// later expectation would have.
    #[error("{}", .failures.join("\n"))]
    OutOfOrder { failures: Vec<String> },

    /// No expectation was available for this request.
    #[error("Unexpected request: {request}")]
    UnexpectedRequest { request: String },

    /// Invocation against an engine that never had expectations registered.
    #[error("Expectations have not been made")]
    NoExpectations,

    /// Verification found expectations that were never matched.
    #[error("There are {count} pending requests:\n{listing}")]
    PendingExpectations { count: usize, listing: String },

    /// Verification ran while queued invocations remained undrained.
    #[error("Expectations have not been flushed. Please call `flush`")]
    NotFlushed,

    /// Verification is disabled on this instance.
    #[error("This ersatz is not verifiable")]
    NotVerifiable,

    /// A queued invocation was never attempted, either because an earlier
    /// invocation failed a serial flush or because the engine went away.
    #[error("Queued invocation was never attempted")]
    NeverInvoked,
}
