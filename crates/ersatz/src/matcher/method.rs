//! HTTP method comparison, case-insensitive.

use super::MatchOutcome;
use crate::descriptor::RequestDescriptor;

/// Compare methods ignoring ASCII case. An actual request with no method is
/// reported as the literal `undefined`.
pub fn match_method(expected: &RequestDescriptor, actual: &RequestDescriptor) -> MatchOutcome {
    let expected_method = expected.method.as_deref().unwrap_or_default();
    let actual_method = actual.method.as_deref().unwrap_or("undefined");

    if actual_method.eq_ignore_ascii_case(expected_method) {
        return Ok(());
    }
    Err(format!(
        "Expected request for {} with method {expected_method}, but got method {actual_method}",
        expected.url_or_empty()
    ))
}
