//! The dev server: every request is matched against the proxy table and
//! either forwarded upstream or answered with 404.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use crate::config::ProxyTable;

/// Largest request body buffered before forwarding.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Connection-scoped headers that must not be relayed.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Clone)]
struct ProxyState {
    table: Arc<ProxyTable>,
    client: reqwest::Client,
}

pub fn app(table: ProxyTable) -> Result<Router, reqwest::Error> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let state = ProxyState {
        table: Arc::new(table),
        client,
    };
    Ok(Router::new().fallback(forward).with_state(state))
}

pub async fn run(listener: TcpListener, table: ProxyTable) -> Result<(), std::io::Error> {
    let app = app(table).map_err(std::io::Error::other)?;
    axum::serve(listener, app).await
}

async fn forward(State(state): State<ProxyState>, request: Request) -> Response {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let Some(target) = state.table.resolve(&path_and_query) else {
        tracing::debug!(path = %path_and_query, "no proxy rule");
        return (StatusCode::NOT_FOUND, "no proxy rule matches this path").into_response();
    };

    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path_and_query, error = %e, "failed to read request body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);
    if let Some(host) = &target.host {
        match HeaderValue::from_str(host) {
            Ok(value) => {
                headers.insert(header::HOST, value);
            }
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "unusable target host");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        }
    }

    let upstream = state
        .client
        .request(parts.method.clone(), &target.url)
        .headers(headers)
        .body(body)
        .send()
        .await;
    let upstream = match upstream {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(method = %parts.method, url = %target.url, error = %e, "upstream request failed");
            return (StatusCode::BAD_GATEWAY, format!("proxy error: {e}")).into_response();
        }
    };

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(url = %target.url, error = %e, "upstream body failed");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };
    tracing::debug!(method = %parts.method, url = %target.url, status = status.as_u16(), "proxied");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
