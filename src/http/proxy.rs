//! `/api/*` pass-through to the backend.
//!
//! Method, headers (minus `host`), raw body and query string go upstream;
//! status, headers and body stream come back untouched. No retries and no
//! circuit breaking; the failures the proxy answers itself are the
//! [`ProxyError`] variants.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use thiserror::Error;

use crate::config::UpstreamTarget;
use crate::http::request::request_id;
use crate::observability::metrics;

/// Shared, immutable proxy state.
#[derive(Clone)]
pub struct ProxyState {
    pub client: reqwest::Client,
    pub upstream: UpstreamTarget,
    pub max_body_size: usize,
}

/// Failures answered by the proxy itself: 413, 400 and 502.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("Request body could not be read")]
    BodyRead(#[source] axum::Error),

    #[error("Upstream request failed")]
    Upstream(#[source] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

/// Path under `/api`, without the leading slash, percent-encoding preserved.
fn forwarded_path(path: &str) -> &str {
    path.strip_prefix("/api")
        .unwrap_or(path)
        .trim_start_matches('/')
}

fn is_bodiless(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Forward one request upstream and stream the answer back.
pub async fn proxy_handler(State(state): State<ProxyState>, request: Request) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().clone();
    let target = state
        .upstream
        .join(forwarded_path(request.uri().path()), request.uri().query());

    tracing::debug!(request_id = %request_id, method = %method, target = %target, "Proxying request");

    match forward(&state, request, &target).await {
        Ok(response) => {
            metrics::record_request(method.as_str(), response.status().as_u16(), start);
            response
        }
        Err(err) => {
            match &err {
                ProxyError::Upstream(e) => {
                    metrics::record_upstream_error(method.as_str());
                    tracing::error!(request_id = %request_id, target = %target, error = %e, "Upstream error");
                }
                ProxyError::BodyTooLarge { .. } | ProxyError::BodyRead(_) => {
                    tracing::warn!(request_id = %request_id, error = %err, "Rejected request body");
                }
            }
            let response = err.into_response();
            metrics::record_request(method.as_str(), response.status().as_u16(), start);
            response
        }
    }
}

async fn forward(state: &ProxyState, request: Request, target: &str) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    let mut headers = parts.headers;
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    headers.remove(header::HOST);
    // Framing is recomputed from the buffered body.
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONTENT_LENGTH);

    let mut outbound = state
        .client
        .request(parts.method.clone(), target)
        .headers(headers);

    if !is_bodiless(&parts.method) {
        if declared.is_some_and(|len| len > state.max_body_size) {
            return Err(ProxyError::BodyTooLarge { limit: state.max_body_size });
        }
        outbound = outbound.body(read_body(body, state.max_body_size).await?);
    }

    let upstream = outbound.send().await.map_err(ProxyError::Upstream)?;

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Buffer `body`, failing once more than `limit` bytes arrive.
async fn read_body(body: Body, limit: usize) -> Result<Vec<u8>, ProxyError> {
    let mut stream = body.into_data_stream();
    let mut buffered = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ProxyError::BodyRead)?;
        if buffered.len() + chunk.len() > limit {
            return Err(ProxyError::BodyTooLarge { limit });
        }
        buffered.extend_from_slice(&chunk);
    }
    Ok(buffered)
}
