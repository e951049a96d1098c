use std::{collections::BTreeMap, io::Write};

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use flate2::{
    write::{GzEncoder, ZlibEncoder},
    Compression,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw on `/echo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    /// Lowercased header names; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub const HELLO: &str = "hello";
pub const GZIP_TEXT: &str = "hello from gzip";
pub const DEFLATE_TEXT: &str = "hello from deflate";
/// Length of the body served by `/large/{code}`.
pub const LARGE_BODY_LEN: usize = 4096;
/// Decompressed length of the body served by `/expanding-gzip`.
pub const EXPANDED_LEN: usize = 1024 * 1024;
/// "café" in ISO-8859-1.
pub const LATIN1_BYTES: [u8; 4] = [0x63, 0x61, 0x66, 0xe9];

pub fn app() -> Router {
    Router::new()
        .route("/ok", get(ok))
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/gzip", get(gzip))
        .route("/deflate", get(deflate))
        .route("/latin1", get(latin1))
        .route("/bytes", get(bytes))
        .route("/large/{code}", get(large))
        .route("/corrupt-gzip/{code}", get(corrupt_gzip))
        .route("/expanding-gzip", get(expanding_gzip))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], HELLO)
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    Json(Echo {
        method: method.to_string(),
        headers: seen,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    match StatusCode::from_u16(code) {
        Ok(status) if code >= 200 => (
            status,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("status {code}"),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("unsupported status {code}"),
        ),
    }
}

async fn gzip() -> Result<impl IntoResponse, StatusCode> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(GZIP_TEXT.as_bytes()).map_err(internal)?;
    let body = encoder.finish().map_err(internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CONTENT_ENCODING, "gzip"),
        ],
        body,
    ))
}

async fn deflate() -> Result<impl IntoResponse, StatusCode> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(DEFLATE_TEXT.as_bytes()).map_err(internal)?;
    let body = encoder.finish().map_err(internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CONTENT_ENCODING, "deflate"),
        ],
        body,
    ))
}

async fn latin1() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
        LATIN1_BYTES.to_vec(),
    )
}

async fn bytes() -> impl IntoResponse {
    let body: Vec<u8> = (0..=255u8).collect();
    ([(header::CONTENT_TYPE, "application/octet-stream")], body)
}

fn status_or_500(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn large(Path(code): Path<u16>) -> impl IntoResponse {
    (
        status_or_500(code),
        [(header::CONTENT_TYPE, "text/plain")],
        "x".repeat(LARGE_BODY_LEN),
    )
}

/// Claims gzip but sends plain text.
async fn corrupt_gzip(Path(code): Path<u16>) -> impl IntoResponse {
    (
        status_or_500(code),
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CONTENT_ENCODING, "gzip"),
        ],
        "this is not gzip",
    )
}

/// A few kilobytes on the wire that inflate to `EXPANDED_LEN` zero bytes.
async fn expanding_gzip() -> Result<impl IntoResponse, StatusCode> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&vec![0u8; EXPANDED_LEN]).map_err(internal)?;
    let body = encoder.finish().map_err(internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (header::CONTENT_ENCODING, "gzip"),
        ],
        body,
    ))
}

fn internal(_: std::io::Error) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}
