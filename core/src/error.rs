//! Error types for the transport core.
//!
//! # Design
//! Only `HttpResponse` carries a received response, so recovering the status
//! code from a failure is a pattern match (`Error::status`) rather than a
//! runtime type test. Malformed requests get their own variant even though,
//! like network faults, they report no status: they fail before any I/O and
//! retrying them is pointless.

use std::fmt;

use crate::http::find_header;

/// Boxed error returned by caller-supplied hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by `Client` send operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The URL, method or a header could not be turned into a request.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Connecting, writing or reading failed before a usable response arrived.
    #[error("transport failure: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body could not be decompressed.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] std::io::Error),

    /// The server answered with a status the client treats as a failure.
    #[error(transparent)]
    HttpResponse(#[from] HttpResponseError),

    /// A request or response hook returned an error.
    #[error("{stage} hook failed: {source}")]
    Hook {
        stage: HookStage,
        #[source]
        source: BoxError,
    },

    /// A form value could not be URL-encoded.
    #[error("form serialization failed: {0}")]
    Serialization(#[from] serde_urlencoded::ser::Error),
}

impl Error {
    /// The HTTP status attached to this failure, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpResponse(res) => Some(res.status),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&HttpResponseError> {
        match self {
            Error::HttpResponse(res) => Some(res),
            _ => None,
        }
    }
}

/// Which hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Request,
    Response,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::Request => write!(f, "request"),
            HookStage::Response => write!(f, "response"),
        }
    }
}

/// A fully buffered response whose status was treated as a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP {status}")]
pub struct HttpResponseError {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Decompressed response body.
    pub body: Vec<u8>,
}

impl HttpResponseError {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Body decoded with the charset declared in `Content-Type`.
    pub fn body_text(&self) -> String {
        crate::decode::decode_text(self.header("content-type"), &self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> Error {
        Error::HttpResponse(HttpResponseError {
            status: 404,
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
            body: b"no such thing".to_vec(),
        })
    }

    #[test]
    fn status_is_extracted_from_response_failures() {
        let err = not_found();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.response().unwrap().body_text(), "no such thing");
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn other_failures_have_no_status() {
        let malformed = Error::MalformedRequest("not a url".to_string());
        assert_eq!(malformed.status(), None);

        let decode = Error::Decode(std::io::Error::other("corrupt deflate stream"));
        assert_eq!(decode.status(), None);
        assert!(decode.response().is_none());

        let hook = Error::Hook {
            stage: HookStage::Request,
            source: "denied".into(),
        };
        assert_eq!(hook.status(), None);
        assert_eq!(hook.to_string(), "request hook failed: denied");
    }
}
