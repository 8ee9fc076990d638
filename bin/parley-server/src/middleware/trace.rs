//! Per-request trace span.
//!
//! Every request runs inside an `http_request` span keyed by a trace id.
//! A UUID supplied in `x-trace-id` is reused, anything else is replaced by
//! a fresh one; the id is echoed on the response.  Small JSON bodies are
//! logged at `debug`.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

const MAX_LOGGED_BODY_BYTES: usize = 1024;

pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (mut parts, body) = req.into_parts();
        let req_bytes = buffer_and_log("request", &parts.headers, body).await;
        if let Some(value) = header_value.clone() {
            parts.headers.insert(X_TRACE_ID, value);
        }

        let response = next.run(Request::from_parts(parts, Body::from(req_bytes))).await;

        let (mut parts, body) = response.into_parts();
        let res_bytes = buffer_and_log("response", &parts.headers, body).await;
        if let Some(value) = header_value {
            parts.headers.insert(X_TRACE_ID, value);
        }

        info!(
            status = parts.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "← response finished"
        );

        Response::from_parts(parts, Body::from(res_bytes))
    }
    .instrument(span)
    .await
}

/// Collect a body, logging it when it is small JSON.
async fn buffer_and_log(direction: &str, headers: &HeaderMap, body: Body) -> Bytes {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, direction, "failed to buffer body");
            return Bytes::new();
        }
    };

    if content_type.contains("application/json") && bytes.len() < MAX_LOGGED_BODY_BYTES {
        if let Ok(text) = std::str::from_utf8(&bytes) {
            debug!(body = text, "{direction} body");
        }
    } else if !bytes.is_empty() {
        debug!(content_type, size = bytes.len(), "{direction} body skipped");
    }

    bytes
}
