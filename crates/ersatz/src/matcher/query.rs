//! Query-parameter comparison.
//!
//! The expected side is the descriptor's `params` map; the actual side is
//! parsed from the query string of the actual URL. Order is irrelevant, but
//! key/value equality is exact: extra or missing keys are failures.

use super::MatchOutcome;
use crate::descriptor::RequestDescriptor;
use std::collections::HashMap;

/// Parse a query string into a map, URL-decoding values.
pub fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(q) = query {
        for pair in q.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                params.insert(
                    key.to_string(),
                    urlencoding::decode(value).unwrap_or_default().to_string(),
                );
            } else if !pair.is_empty() {
                params.insert(pair.to_string(), String::new());
            }
        }
    }
    params
}

/// Render a param map as a canonical (key-sorted) query string.
fn canonical_query(params: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();
    keys.iter()
        .map(|k| format!("{}={}", k, urlencoding::encode(&params[*k])))
        .collect::<Vec<_>>()
        .join("&")
}

fn query_of(url: &str) -> Option<&str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    without_fragment.split_once('?').map(|(_, q)| q)
}

/// Compare expected `params` against the actual URL's parsed query string.
pub fn match_params(expected: &RequestDescriptor, actual: &RequestDescriptor) -> MatchOutcome {
    let expected_params = expected.params.clone().unwrap_or_default();
    let actual_params = parse_query_string(query_of(actual.url_or_empty()));

    if expected_params == actual_params {
        return Ok(());
    }

    let rendered_expected = if expected_params.is_empty() {
        "<NONE EXPECTED>".to_string()
    } else {
        canonical_query(&expected_params)
    };
    let rendered_actual = if actual_params.is_empty() {
        "<NONE RECEIVED>".to_string()
    } else {
        canonical_query(&actual_params)
    };
    Err(format!(
        "Expected request for {} with params \"{rendered_expected}\", but got \"{rendered_actual}\"",
        expected.url_or_empty()
    ))
}
