//! URL comparison that ignores the query string.
//!
//! Two descriptors with identical scheme, host, and path but different query
//! strings still match on URL; the query matcher owns that dimension.

use super::MatchOutcome;
use crate::descriptor::RequestDescriptor;

/// The parts of a URL that participate in URL matching.
#[derive(Debug, PartialEq)]
struct UrlParts<'a> {
    scheme: Option<&'a str>,
    host: Option<&'a str>,
    path: &'a str,
}

impl<'a> UrlParts<'a> {
    /// Host without the port, when a host is present.
    fn hostname(&self) -> Option<&'a str> {
        self.host.map(|h| h.split(':').next().unwrap_or(h))
    }
}

/// Split a possibly-relative URL into scheme, host, and path, dropping the
/// query string and fragment.
fn split_url(url: &str) -> UrlParts<'_> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);

    if let Some((scheme, rest)) = without_query.split_once("://") {
        let (host, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };
        UrlParts {
            scheme: Some(scheme),
            host: Some(host),
            path,
        }
    } else {
        UrlParts {
            scheme: None,
            host: None,
            path: without_query,
        }
    }
}

/// Compare scheme, host, hostname, and path of the two URLs.
pub fn match_url(expected: &RequestDescriptor, actual: &RequestDescriptor) -> MatchOutcome {
    let expected_url = expected.url_or_empty();
    let actual_url = actual.url_or_empty();
    let e = split_url(expected_url);
    let a = split_url(actual_url);

    if e.scheme == a.scheme && e.host == a.host && e.hostname() == a.hostname() && e.path == a.path
    {
        return Ok(());
    }
    Err(format!(
        "Expected request for {expected_url}, but got {actual_url}"
    ))
}
