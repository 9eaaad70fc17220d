//! Header comparison: only the expected headers are checked.
//!
//! Actual requests may carry extra headers without failing. Lookups are
//! case-insensitive, against lowercase-normalized actual keys. The first
//! mismatched key (in sorted key order, so diagnostics are deterministic)
//! aborts the matcher.

use super::MatchOutcome;
use crate::descriptor::RequestDescriptor;
use std::collections::HashMap;

/// Check every expected header against the actual headers.
pub fn match_headers(expected: &RequestDescriptor, actual: &RequestDescriptor) -> MatchOutcome {
    let empty = HashMap::new();
    let expected_headers = expected.headers.as_ref().unwrap_or(&empty);

    let actual_headers: HashMap<String, &str> = actual
        .headers
        .iter()
        .flatten()
        .map(|(k, v)| (k.to_lowercase(), v.as_str()))
        .collect();

    let mut keys: Vec<&String> = expected_headers.keys().collect();
    keys.sort();
    for key in keys {
        let value = &expected_headers[key];
        if actual_headers.get(&key.to_lowercase()).copied() != Some(value.as_str()) {
            return Err(format!(
                "Expected request for {} to have header {key} with value {value}",
                expected.url_or_empty()
            ));
        }
    }
    Ok(())
}
