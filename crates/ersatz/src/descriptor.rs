//! Request and response descriptors exchanged with the test harness.
//!
//! These are plain value types: the engine never touches a socket, so a
//! "request" is whatever the harness says it is. Builder-style constructors
//! keep fixture code short.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// An expected or actual HTTP request, as described by the harness.
///
/// `url` and `method` are optional at the type level; an [`crate::Expectation`]
/// refuses to be built from a descriptor missing either one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Expected query parameters, matched against the query string of the
    /// actual request's URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
}

impl RequestDescriptor {
    /// Descriptor with the given method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            method: Some(method.into()),
            ..Self::default()
        }
    }

    /// GET descriptor for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// POST descriptor for `url`.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// The URL, or an empty string when absent. Diagnostics only.
    pub(crate) fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// The canned response paired with an expectation.
///
/// Returned verbatim on a successful match; the engine never inspects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ResponseDescriptor {
    /// A 200 response with no headers or body.
    pub fn ok() -> Self {
        Self {
            status_code: Some(200),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Effective status code; unset means 200.
    pub fn status(&self) -> u16 {
        self.status_code.unwrap_or(200)
    }
}
