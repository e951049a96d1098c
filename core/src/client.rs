//! Blocking HTTP client: the transport core and its verb facades.
//!
//! # Design
//! Every operation funnels into `Client::execute`, which performs exactly one
//! request/response cycle:
//!
//! 1. build an `OutgoingRequest` from the options and client config
//! 2. let the request hook rewrite it
//! 3. send it, with the body if one was given
//! 4. apply the status policy, then let the response hook see the status
//!    line and headers
//! 5. buffer and decompress the whole body
//!
//! `send_text` and `send_bytes` differ only in whether the buffered body is
//! decoded with the response charset. The verb helpers bind a method (and for
//! POST/PUT a form body) and otherwise delegate unchanged.
//!
//! A fresh `ureq::Agent` with idle pooling disabled is built per call, so no
//! connection outlives the call that opened it. Early returns drop the
//! response, which releases the connection on every failure path.

use log::{debug, warn};
use serde::Serialize;
use ureq::http;

use crate::config::ClientConfig;
use crate::decode;
use crate::error::{BoxError, Error, HookStage, HttpResponseError, Result};
use crate::http::{content_type, IncomingResponse, OutgoingRequest};
use crate::options::SendOptions;

/// Synchronous, stateless HTTP client.
///
/// Holds only configuration; each call opens and releases its own connection,
/// so a `Client` can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request with an optional text body and return the response body
    /// decoded with its declared charset.
    pub fn send_text(&self, url: &str, body: Option<&str>, options: SendOptions<'_>) -> Result<String> {
        let (response, body) = self.execute(url, body.map(str::as_bytes), options)?;
        Ok(decode::decode_text(response.content_type(), &body))
    }

    /// Send a request with an optional binary body and return the raw
    /// (decompressed) response body.
    pub fn send_bytes(&self, url: &str, body: Option<&[u8]>, options: SendOptions<'_>) -> Result<Vec<u8>> {
        let (_, body) = self.execute(url, body, options)?;
        Ok(body)
    }

    /// GET with the `Accept` header taken from `options` (default `*/*`).
    pub fn get_string(&self, url: &str, options: SendOptions<'_>) -> Result<String> {
        self.send_text(url, None, with_method("GET", options))
    }

    pub fn get_json(&self, url: &str, options: SendOptions<'_>) -> Result<String> {
        self.get_string(url, options.accept(content_type::JSON))
    }

    pub fn get_xml(&self, url: &str, options: SendOptions<'_>) -> Result<String> {
        self.get_string(url, options.accept(content_type::XML))
    }

    /// POST `form` as `application/x-www-form-urlencoded`. `None` sends no body.
    pub fn post_form<T>(&self, url: &str, form: Option<&T>, options: SendOptions<'_>) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        self.send_form("POST", url, form, options)
    }

    /// PUT `form` as `application/x-www-form-urlencoded`. `None` sends no body.
    pub fn put_form<T>(&self, url: &str, form: Option<&T>, options: SendOptions<'_>) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        self.send_form("PUT", url, form, options)
    }

    pub fn delete(&self, url: &str, options: SendOptions<'_>) -> Result<String> {
        self.send_text(url, None, with_method("DELETE", options))
    }

    pub fn options(&self, url: &str, options: SendOptions<'_>) -> Result<String> {
        self.send_text(url, None, with_method("OPTIONS", options))
    }

    pub fn head(&self, url: &str, options: SendOptions<'_>) -> Result<String> {
        self.send_text(url, None, with_method("HEAD", options))
    }

    /// Status of a plain GET to `url`, whether it succeeded or failed.
    ///
    /// Returns `None` when no response was received at all.
    pub fn response_status(&self, url: &str) -> Option<u16> {
        let mut status = None;
        let result = self.send_bytes(
            url,
            None,
            SendOptions::new().on_response(|res| {
                status = Some(res.status);
                Ok(())
            }),
        );
        match result {
            Ok(_) => status,
            Err(err) => err.status(),
        }
    }

    fn send_form<T>(&self, method: &str, url: &str, form: Option<&T>, options: SendOptions<'_>) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let body = form.map(serde_urlencoded::to_string).transpose()?;
        let options = SendOptions {
            method: Some(method.to_string()),
            content_type: Some(content_type::FORM_URL_ENCODED.to_string()),
            ..options
        };
        self.send_text(url, body.as_deref(), options)
    }

    fn execute(
        &self,
        url: &str,
        body: Option<&[u8]>,
        options: SendOptions<'_>,
    ) -> Result<(IncomingResponse, Vec<u8>)> {
        let SendOptions {
            method,
            content_type,
            accept,
            request_hook,
            response_hook,
        } = options;

        let mut request = OutgoingRequest::new(url);
        if let Some(method) = method {
            request.method = method;
        }
        request.content_type = content_type;
        request.accept = accept;
        request.set_header("user-agent", &self.config.user_agent());
        request.timeout = self.config.timeout();

        if let Some(hook) = request_hook {
            hook(&mut request).map_err(|source| hook_failed(HookStage::Request, &request.url, source))?;
        }

        let http_request = to_http_request(&request)?;
        let agent = self.agent(&request);
        debug!("{} {}", request.method, request.url);

        let sent = match body {
            Some(bytes) => agent.run(http_request.map(|()| bytes)),
            None => agent.run(http_request),
        };
        let mut response = sent.map_err(transport_failure)?;

        let incoming = IncomingResponse {
            status: response.status().as_u16(),
            headers: response
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
                .collect(),
        };

        if self.config.status_as_error && incoming.status >= 400 {
            // The status must survive even when the error body is unreadable.
            let body = self.drain(&mut response, &incoming).unwrap_or_else(|err| {
                warn!("discarding body of {} response from {}: {err}", incoming.status, request.url);
                Vec::new()
            });
            debug!("{} {} failed with {}", request.method, request.url, incoming.status);
            return Err(HttpResponseError {
                status: incoming.status,
                headers: incoming.headers,
                body,
            }
            .into());
        }

        if let Some(hook) = response_hook {
            hook(&incoming).map_err(|source| hook_failed(HookStage::Response, &request.url, source))?;
        }

        let body = self.drain(&mut response, &incoming)?;
        debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url,
            incoming.status,
            body.len()
        );
        Ok((incoming, body))
    }

    fn agent(&self, request: &OutgoingRequest) -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(request.timeout)
            .max_idle_connections(0)
            .max_idle_connections_per_host(0)
            .build()
            .new_agent()
    }

    fn drain(&self, response: &mut http::Response<ureq::Body>, incoming: &IncomingResponse) -> Result<Vec<u8>> {
        let raw = response
            .body_mut()
            .with_config()
            .limit(self.config.max_response_bytes)
            .read_to_vec()
            .map_err(transport_failure)?;
        decode::decompress(incoming.content_encoding(), raw, self.config.max_response_bytes).map_err(Error::Decode)
    }
}

fn with_method<'a>(method: &str, options: SendOptions<'a>) -> SendOptions<'a> {
    SendOptions {
        method: Some(method.to_string()),
        ..options
    }
}

/// Translate the (possibly hook-modified) request into the transport's form.
fn to_http_request(request: &OutgoingRequest) -> Result<http::Request<()>> {
    let url = url::Url::parse(&request.url)
        .map_err(|e| Error::MalformedRequest(format!("invalid url `{}`: {e}", request.url)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::MalformedRequest(format!(
            "unsupported scheme `{}` in `{}`",
            url.scheme(),
            request.url
        )));
    }

    let mut builder = http::Request::builder()
        .method(request.method.as_str())
        .uri(url.as_str())
        .header(http::header::ACCEPT, request.accept.as_str());
    if let Some(content_type) = &request.content_type {
        builder = builder.header(http::header::CONTENT_TYPE, content_type.as_str());
    }
    let mut http_request = builder.body(()).map_err(|e| Error::MalformedRequest(e.to_string()))?;

    // Accept and Content-Type are single-valued: a header entry replaces the field.
    let headers = http_request.headers_mut();
    for (name, value) in &request.headers {
        let name = http::HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::MalformedRequest(format!("invalid header name `{name}`: {e}")))?;
        let value = http::HeaderValue::from_str(value)
            .map_err(|e| Error::MalformedRequest(format!("invalid value for header `{name}`: {e}")))?;
        if name == http::header::ACCEPT || name == http::header::CONTENT_TYPE {
            headers.insert(name, value);
        } else {
            headers.append(name, value);
        }
    }
    Ok(http_request)
}

fn transport_failure(err: ureq::Error) -> Error {
    match err {
        ureq::Error::BadUri(reason) => Error::MalformedRequest(reason),
        ureq::Error::Http(err) => Error::MalformedRequest(err.to_string()),
        other => Error::Transport(other),
    }
}

fn hook_failed(stage: HookStage, url: &str, source: BoxError) -> Error {
    warn!("{stage} hook failed for {url}: {source}");
    Error::Hook { stage, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> OutgoingRequest {
        OutgoingRequest::new(url)
    }

    #[test]
    fn http_request_carries_accept_content_type_and_headers() {
        let mut req = request("http://localhost:3000/echo");
        req.method = "POST".to_string();
        req.content_type = Some(content_type::JSON.to_string());
        req.accept = content_type::XML.to_string();
        req.set_header("x-trace", "abc");

        let http_req = to_http_request(&req).unwrap();
        assert_eq!(*http_req.method(), http::Method::POST);
        assert_eq!(http_req.uri(), "http://localhost:3000/echo");
        let headers = http_req.headers();
        assert_eq!(headers["accept"], "application/xml");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["accept-encoding"], "gzip,deflate");
        assert_eq!(headers["x-trace"], "abc");
    }

    #[test]
    fn header_entries_replace_accept_and_content_type() {
        let mut req = request("http://localhost:3000/echo");
        req.content_type = Some(content_type::JSON.to_string());
        req.set_header("Accept", "text/html");
        req.set_header("Content-Type", "text/csv");
        req.headers.push(("x-tag".to_string(), "one".to_string()));
        req.headers.push(("x-tag".to_string(), "two".to_string()));

        let http_req = to_http_request(&req).unwrap();
        let headers = http_req.headers();
        let accepts: Vec<_> = headers.get_all("accept").iter().collect();
        assert_eq!(accepts, ["text/html"]);
        let content_types: Vec<_> = headers.get_all("content-type").iter().collect();
        assert_eq!(content_types, ["text/csv"]);
        assert_eq!(headers.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn missing_content_type_is_not_sent() {
        let http_req = to_http_request(&request("http://localhost:3000/ok")).unwrap();
        assert_eq!(*http_req.method(), http::Method::GET);
        assert!(http_req.headers().get("content-type").is_none());
        assert_eq!(http_req.headers()["accept"], "*/*");
    }

    #[test]
    fn unparseable_url_is_malformed() {
        let err = to_http_request(&request("not a url")).unwrap_err();
        assert!(matches!(err, Error::MalformedRequest(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn non_http_scheme_is_malformed() {
        let err = to_http_request(&request("ftp://example.test/file")).unwrap_err();
        assert!(matches!(err, Error::MalformedRequest(msg) if msg.contains("ftp")));
    }

    #[test]
    fn bad_method_and_header_are_malformed() {
        let mut req = request("http://localhost:3000/ok");
        req.method = "GE T".to_string();
        assert!(matches!(to_http_request(&req), Err(Error::MalformedRequest(_))));

        let mut req = request("http://localhost:3000/ok");
        req.set_header("bad header", "x");
        assert!(matches!(to_http_request(&req), Err(Error::MalformedRequest(_))));
    }

    #[test]
    fn request_hook_failure_stops_before_any_io() {
        let err = Client::default()
            .send_text(
                "http://192.0.2.1:9/",
                None,
                SendOptions::new().on_request(|_| Err("vetoed".into())),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Hook { stage: HookStage::Request, .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn malformed_url_fails_before_any_io() {
        let err = Client::default().get_string("::nope::", SendOptions::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedRequest(_)));
    }

    #[test]
    fn request_hook_sees_defaults_from_config() {
        let client = Client::new(ClientConfig {
            timeout_secs: Some(3),
            user_agent: Some("fixture/2".to_string()),
            ..ClientConfig::default()
        });
        let mut seen = None;
        let _ = client.send_text(
            "http://192.0.2.1:9/",
            None,
            SendOptions::new().method("DELETE").on_request(|req| {
                seen = Some(req.clone());
                Err("stop here".into())
            }),
        );
        let seen = seen.unwrap();
        assert_eq!(seen.method, "DELETE");
        assert_eq!(seen.accept, "*/*");
        assert_eq!(seen.header("user-agent"), Some("fixture/2"));
        assert_eq!(seen.header("accept-encoding"), Some("gzip,deflate"));
        assert_eq!(seen.timeout, Some(std::time::Duration::from_secs(3)));
    }
}
