//! Per-call options for the send operations.

use crate::error::BoxError;
use crate::http::{IncomingResponse, OutgoingRequest, DEFAULT_ACCEPT};

pub type HookResult = Result<(), BoxError>;

/// Runs after the request is built and before anything is sent.
pub type RequestHook<'a> = Box<dyn FnOnce(&mut OutgoingRequest) -> HookResult + 'a>;

/// Runs after the status line and headers arrive, before the body is read.
pub type ResponseHook<'a> = Box<dyn FnOnce(&IncomingResponse) -> HookResult + 'a>;

/// Optional parameters of a send call.
///
/// | field          | default                 |
/// |----------------|-------------------------|
/// | `method`       | `GET`                   |
/// | `content_type` | none                    |
/// | `accept`       | `*/*`                   |
/// | `on_request`   | none                    |
/// | `on_response`  | none                    |
///
/// Hooks borrow for `'a`, so they may capture locals of the caller.
pub struct SendOptions<'a> {
    pub method: Option<String>,
    pub content_type: Option<String>,
    pub accept: String,
    pub request_hook: Option<RequestHook<'a>>,
    pub response_hook: Option<ResponseHook<'a>>,
}

impl Default for SendOptions<'_> {
    fn default() -> Self {
        Self {
            method: None,
            content_type: None,
            accept: DEFAULT_ACCEPT.to_string(),
            request_hook: None,
            response_hook: None,
        }
    }
}

impl<'a> SendOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn accept(mut self, accept: &str) -> Self {
        self.accept = accept.to_string();
        self
    }

    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut OutgoingRequest) -> HookResult + 'a,
    {
        self.request_hook = Some(Box::new(hook));
        self
    }

    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&IncomingResponse) -> HookResult + 'a,
    {
        self.response_hook = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for SendOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendOptions")
            .field("method", &self.method)
            .field("content_type", &self.content_type)
            .field("accept", &self.accept)
            .field("request_hook", &self.request_hook.is_some())
            .field("response_hook", &self.response_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = SendOptions::new();
        assert!(opts.method.is_none());
        assert!(opts.content_type.is_none());
        assert_eq!(opts.accept, "*/*");
        assert!(opts.request_hook.is_none());
        assert!(opts.response_hook.is_none());
    }

    #[test]
    fn builder_sets_fields_and_hooks() {
        let opts = SendOptions::new()
            .method("PUT")
            .content_type("application/json")
            .accept("application/xml")
            .on_request(|req| {
                req.set_header("x-trace", "1");
                Ok(())
            })
            .on_response(|_| Ok(()));
        assert_eq!(opts.method.as_deref(), Some("PUT"));
        assert_eq!(opts.content_type.as_deref(), Some("application/json"));
        assert_eq!(opts.accept, "application/xml");
        assert_eq!(
            format!("{opts:?}"),
            r#"SendOptions { method: Some("PUT"), content_type: Some("application/json"), accept: "application/xml", request_hook: true, response_hook: true }"#
        );
    }
}
