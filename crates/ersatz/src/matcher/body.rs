//! Structural body comparison.
//!
//! Bodies are arbitrary JSON trees; equality is structural, never reference.
//! An absent expected body matches an empty actual payload (and vice versa):
//! `None`, `null`, and `""` are all treated as "no body".

use super::MatchOutcome;
use crate::descriptor::RequestDescriptor;
use serde_json::Value;

fn effectively_empty(body: Option<&Value>) -> bool {
    match body {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn render(body: Option<&Value>) -> String {
    match body {
        Some(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        None => "undefined".to_string(),
    }
}

/// Deep-compare expected and actual bodies.
pub fn match_body(expected: &RequestDescriptor, actual: &RequestDescriptor) -> MatchOutcome {
    let expected_body = expected.body.as_ref();
    let actual_body = actual.body.as_ref();

    if expected_body == actual_body
        || (effectively_empty(expected_body) && effectively_empty(actual_body))
    {
        return Ok(());
    }
    Err(format!(
        "Expected request for {} to have body {}, but got {}",
        expected.url_or_empty(),
        render(expected_body),
        render(actual_body)
    ))
}
