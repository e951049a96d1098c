//! Request and response descriptors exchanged with caller hooks.
//!
//! # Design
//! These types describe one HTTP exchange as plain data. `OutgoingRequest` is
//! built fresh for every call, handed to the request hook for mutation, and
//! then translated into the host transport's request. `IncomingResponse`
//! carries the status line and headers of a received response; the body is
//! drained separately, after the response hook has run.
//!
//! All fields use owned types (`String`, `Vec`) so hooks can freely inspect
//! and rewrite them without lifetime concerns.

use std::time::Duration;

/// Media type constants for the `Content-Type` and `Accept` headers.
pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
}

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_ACCEPT: &str = "*/*";

/// Response encodings every request advertises.
pub const ACCEPT_ENCODING: &str = "gzip,deflate";

/// An HTTP request described as plain data.
///
/// Built by `Client` for every call. The request hook may change any field;
/// whatever is present when the hook returns is what goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    pub url: String,
    pub method: String,
    pub content_type: Option<String>,
    pub accept: String,
    /// Additional headers, sent in order after `Content-Type` and `Accept`.
    pub headers: Vec<(String, String)>,
    /// Overall deadline for the call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl OutgoingRequest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: DEFAULT_METHOD.to_string(),
            content_type: None,
            accept: DEFAULT_ACCEPT.to_string(),
            headers: vec![("accept-encoding".to_string(), ACCEPT_ENCODING.to_string())],
            timeout: None,
        }
    }

    /// Replace every header named `name` (case-insensitive) with a single value.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Status and headers of a received response, before its body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl IncomingResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.header("content-encoding")
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_has_defaults() {
        let req = OutgoingRequest::new("http://localhost:3000/ok");
        assert_eq!(req.method, "GET");
        assert_eq!(req.accept, "*/*");
        assert!(req.content_type.is_none());
        assert_eq!(req.header("Accept-Encoding"), Some("gzip,deflate"));
        assert!(req.timeout.is_none());
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut req = OutgoingRequest::new("http://localhost:3000/ok");
        req.set_header("X-Trace", "a");
        req.set_header("x-trace", "b");
        let traces: Vec<_> = req
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("x-trace"))
            .collect();
        assert_eq!(traces.len(), 1);
        assert_eq!(req.header("X-TRACE"), Some("b"));
    }

    #[test]
    fn response_header_lookup() {
        let res = IncomingResponse {
            status: 200,
            headers: vec![
                ("content-type".to_string(), "text/plain".to_string()),
                ("content-encoding".to_string(), "gzip".to_string()),
            ],
        };
        assert_eq!(res.content_type(), Some("text/plain"));
        assert_eq!(res.content_encoding(), Some("gzip"));
        assert_eq!(res.header("x-missing"), None);
    }
}
