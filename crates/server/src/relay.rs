//! Verbatim forwarding of `/search` and `/download_proxy` to the search backend.
//!
//! The page only ever talks to its own origin; this relay hands those calls to
//! whatever backend `SEARCH_BACKEND_URL` names and streams the answer back.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Request bodies are small JSON documents.
const MAX_REQUEST_BODY: usize = 1024 * 1024;

const FORWARDED_REQUEST_HEADERS: [HeaderName; 3] =
    [header::CONTENT_TYPE, header::ACCEPT, header::COOKIE];

const RETURNED_RESPONSE_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CONTENT_DISPOSITION,
    header::CONTENT_LENGTH,
    header::SET_COOKIE,
];

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Search backend is not configured.")]
    NotConfigured,
    #[error("Could not read the request body.")]
    RequestBody(#[source] axum::Error),
    #[error("Could not reach the search backend.")]
    Unreachable(#[source] reqwest::Error),
    #[error("Invalid response from the search backend.")]
    BadResponse(#[from] axum::http::Error),
}

impl RelayError {
    fn status(&self) -> StatusCode {
        match self {
            RelayError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::RequestBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Unreachable(_) | RelayError::BadResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::NotConfigured => tracing::warn!("Relay called without SEARCH_BACKEND_URL"),
            other => tracing::error!(error = ?other, "Relay failed"),
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Clone, Debug)]
pub struct Relay {
    client: reqwest::Client,
    upstream: Option<String>,
}

impl Relay {
    pub fn new(upstream: Option<String>) -> Self {
        Relay {
            client: reqwest::Client::new(),
            upstream: upstream.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub fn upstream(&self) -> Option<&str> {
        self.upstream.as_deref()
    }

    /// Send `req` to the same path and query on the backend and stream its
    /// reply back. Any upstream status, including errors, is passed through.
    pub async fn forward(&self, req: Request) -> Result<Response, RelayError> {
        let base = self.upstream().ok_or(RelayError::NotConfigured)?;
        let (parts, body) = req.into_parts();
        let url = upstream_url(base, &parts.uri);
        tracing::info!(method = %parts.method, %url, "Relaying request");

        let mut outbound = self.client.request(parts.method.clone(), &url);
        for name in &FORWARDED_REQUEST_HEADERS {
            for value in parts.headers.get_all(name) {
                outbound = outbound.header(name.clone(), value.clone());
            }
        }
        if !matches!(parts.method, Method::GET | Method::HEAD) {
            let bytes = axum::body::to_bytes(body, MAX_REQUEST_BODY)
                .await
                .map_err(RelayError::RequestBody)?;
            outbound = outbound.body(bytes);
        }

        let upstream = outbound.send().await.map_err(RelayError::Unreachable)?;
        tracing::debug!(status = %upstream.status(), %url, "Backend replied");

        let mut response = axum::http::Response::builder().status(upstream.status());
        for name in &RETURNED_RESPONSE_HEADERS {
            for value in upstream.headers().get_all(name) {
                response = response.header(name.clone(), value.clone());
            }
        }
        Ok(response.body(Body::from_stream(upstream.bytes_stream()))?)
    }
}

fn upstream_url(base: &str, uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}{}?{}", base, uri.path(), query),
        None => format!("{}{}", base, uri.path()),
    }
}
