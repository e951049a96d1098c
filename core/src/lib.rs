//! Blocking HTTP convenience layer with status classification.
//!
//! # Overview
//! `Client` sends one HTTP request per call and returns the fully buffered
//! response body as text (`send_text`) or bytes (`send_bytes`). Verb helpers
//! (`get_string`, `post_form`, `delete`, ...) bind a method and delegate to
//! those two. Caller hooks may rewrite the outgoing request and observe the
//! response status and headers before the body is read.
//!
//! Failed calls return [`Error`]. When the failure came from a received
//! response, the [`StatusClass`] predicates (`is_not_found`,
//! `is_client_error`, ...) classify it; every other failure reports no status.
//!
//! # Design
//! - `Client` is stateless apart from its `ClientConfig`; nothing outlives a
//!   single call.
//! - Networking, TLS and redirects are delegated to `ureq`. This crate only
//!   shapes the request, decodes `gzip`/`deflate` bodies and charsets, and
//!   applies the status policy.
//! - The status code travels inside `Error::HttpResponse`, so classification
//!   is a pattern match.

pub mod client;
pub mod config;
mod decode;
pub mod error;
pub mod http;
pub mod options;
pub mod status;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{BoxError, Error, HookStage, HttpResponseError, Result};
pub use crate::http::{content_type, IncomingResponse, OutgoingRequest};
pub use options::{HookResult, SendOptions};
pub use status::StatusClass;
