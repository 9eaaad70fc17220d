//! The matcher pipeline: pure comparisons of one expected request descriptor
//! against one actual request descriptor, one dimension per sub-matcher.
//!
//! # Module structure
//!
//! - `url` - scheme/host/path comparison, query string ignored
//! - `query` - order-independent query parameter comparison
//! - `method` - case-insensitive method comparison
//! - `header` - expected-headers-only comparison, extras allowed
//! - `body` - structural deep equality of JSON bodies
//!
//! Each sub-matcher returns `Ok(())` or a human-readable mismatch message.
//! The aggregate runner collects every failure so one diagnostic can surface
//! multiple simultaneous problems (wrong method *and* wrong header).

mod body;
mod header;
mod method;
mod query;
mod url;

pub use body::match_body;
pub use header::match_headers;
pub use method::match_method;
pub use query::{match_params, parse_query_string};
pub use url::match_url;

use crate::descriptor::RequestDescriptor;

/// Outcome of a single sub-matcher: pass, or a mismatch message.
pub type MatchOutcome = Result<(), String>;

/// Run every sub-matcher over `actual`, collecting all failures.
pub fn run(expected: &RequestDescriptor, actual: &RequestDescriptor) -> Result<(), Vec<String>> {
    let outcomes = [
        match_url(expected, actual),
        match_params(expected, actual),
        match_method(expected, actual),
        match_headers(expected, actual),
        match_body(expected, actual),
    ];
    let failures: Vec<String> = outcomes.into_iter().filter_map(Result::err).collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}
