//! In-process HTTP request/response stub engine.
//!
//! Callers register expected requests paired with canned responses
//! ("expectations"); the code under test issues requests against the engine
//! instead of a real network; the engine matches each incoming request
//! against the registered expectations and returns the paired response or a
//! precise mismatch diagnostic. A final `verify` asserts that every
//! expectation was consumed.
//!
//! The engine never touches a socket: requests and responses are in-memory
//! descriptors supplied by the harness, and "concurrency" is concurrency of
//! pending deferred results on one cooperative scheduler.
//!
//! # Example
//!
//! ```
//! use ersatz::{Ersatz, RequestDescriptor, ResponseDescriptor};
//! use serde_json::json;
//!
//! let ersatz = Ersatz::new();
//! ersatz.expect(
//!     RequestDescriptor::post("/widgets").with_body(json!({"name": "w"})),
//!     ResponseDescriptor::ok().with_body(json!({"id": 1})),
//! )?;
//!
//! let response = ersatz.invoke(
//!     &RequestDescriptor::post("/widgets").with_body(json!({"name": "w"})),
//! )?;
//! assert_eq!(response.status(), 200);
//! ersatz.verify()?;
//! # Ok::<(), ersatz::ErsatzError>(())
//! ```

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod expectation;
pub mod matcher;
pub mod scheduler;

mod ersatz;

pub use crate::descriptor::{RequestDescriptor, ResponseDescriptor};
pub use crate::engine::{Engine, EngineConfig, ExpectationId};
pub use crate::error::ErsatzError;
pub use crate::ersatz::{Ersatz, ErsatzConfig};
pub use crate::expectation::Expectation;
pub use crate::scheduler::{FlushFuture, FlushMode, PendingResponse, Scheduler};
