//! HTTP status classification.
//!
//! Every predicate is built on `status_code`. A value without a status (a
//! network failure, a malformed request, a hook error) answers `false` to all
//! of them.

use crate::error::{Error, HttpResponseError};
use crate::http::IncomingResponse;

pub trait StatusClass {
    /// The HTTP status code carried by this value, exactly as received.
    fn status_code(&self) -> Option<u16>;

    /// 1xx
    fn is_informational(&self) -> bool {
        in_range(self.status_code(), 100, 200)
    }

    /// 2xx
    fn is_success(&self) -> bool {
        in_range(self.status_code(), 200, 300)
    }

    /// 3xx
    fn is_redirect(&self) -> bool {
        in_range(self.status_code(), 300, 400)
    }

    /// 4xx
    fn is_client_error(&self) -> bool {
        in_range(self.status_code(), 400, 500)
    }

    /// 5xx
    fn is_server_error(&self) -> bool {
        in_range(self.status_code(), 500, 600)
    }

    fn is_bad_request(&self) -> bool {
        self.status_code() == Some(400)
    }

    fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Exactly 500 Internal Server Error.
    fn is_server_fault(&self) -> bool {
        self.status_code() == Some(500)
    }
}

fn in_range(status: Option<u16>, start: u16, end: u16) -> bool {
    matches!(status, Some(code) if (start..end).contains(&code))
}

impl StatusClass for Error {
    fn status_code(&self) -> Option<u16> {
        self.status()
    }
}

impl StatusClass for HttpResponseError {
    fn status_code(&self) -> Option<u16> {
        Some(self.status)
    }
}

impl StatusClass for IncomingResponse {
    fn status_code(&self) -> Option<u16> {
        Some(self.status)
    }
}

impl StatusClass for Option<u16> {
    fn status_code(&self) -> Option<u16> {
        *self
    }
}

impl<T> StatusClass for Result<T, Error> {
    fn status_code(&self) -> Option<u16> {
        self.as_ref().err().and_then(Error::status)
    }
}
