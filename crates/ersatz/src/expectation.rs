//! A single expected request paired with the response to return on match.

use crate::descriptor::{RequestDescriptor, ResponseDescriptor};
use crate::error::ErsatzError;
use crate::matcher;

/// One registered expectation: the request the harness promises to make and
/// the canned response to answer it with.
///
/// Construction validates that the expected request carries a URL and a
/// method; a descriptor missing either is a programmer error in the test
/// setup and surfaces immediately, not at invocation time.
#[derive(Debug, Clone)]
pub struct Expectation {
    request: RequestDescriptor,
    response: ResponseDescriptor,
    request_count: u32,
}

impl Expectation {
    pub fn new(
        request: RequestDescriptor,
        response: ResponseDescriptor,
    ) -> Result<Self, ErsatzError> {
        if request.url.as_deref().map_or(true, str::is_empty) {
            return Err(ErsatzError::MissingUrl);
        }
        if request.method.as_deref().map_or(true, str::is_empty) {
            return Err(ErsatzError::MissingMethod);
        }
        Ok(Self {
            request,
            response,
            request_count: 0,
        })
    }

    /// Run the full matcher pipeline against `actual`. Read-only; never
    /// mutates the expectation.
    pub fn matches(&self, actual: &RequestDescriptor) -> Result<(), ErsatzError> {
        matcher::run(&self.request, actual)
            .map_err(|failures| ErsatzError::Mismatch { failures })
    }

    pub fn request(&self) -> &RequestDescriptor {
        &self.request
    }

    pub fn response(&self) -> &ResponseDescriptor {
        &self.response
    }

    /// How many times this expectation has been successfully matched.
    pub fn request_count(&self) -> u32 {
        self.request_count
    }

    /// True until the first successful match.
    pub fn is_pending(&self) -> bool {
        self.request_count < 1
    }

    pub(crate) fn mark_satisfied(&mut self) {
        self.request_count += 1;
    }

    /// Human-readable rendering: method, url, headers, and body.
    pub fn describe(&self) -> String {
        let headers = self
            .request
            .headers
            .as_ref()
            .and_then(|h| serde_json::to_string(h).ok())
            .unwrap_or_else(|| "undefined".to_string());
        let body = self
            .request
            .body
            .as_ref()
            .and_then(|b| serde_json::to_string(b).ok())
            .unwrap_or_else(|| "undefined".to_string());
        format!(
            "{} {}, headers: {}, body: {}",
            self.request.method.as_deref().unwrap_or_default(),
            self.request.url_or_empty(),
            headers,
            body
        )
    }

    /// Rendering prefixed with the satisfaction count, for registries that
    /// allow repeated matching of one expectation.
    pub fn describe_with_count(&self) -> String {
        format!("({}) {}", self.request_count, self.describe())
    }
}
