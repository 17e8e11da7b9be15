use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id that is reused as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Client windows kept before expired ones are swept.
const SWEEP_THRESHOLD: usize = 1024;

/// Request id for the current request, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn caller_request_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let usable = !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw.chars().all(|c| c.is_ascii_graphic());
    usable.then(|| raw.to_owned())
}

/// Reuses a well-formed `x-request-id` from the caller or mints a `UUIDv4`,
/// exposes it to handlers as [`RequestId`] and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = caller_request_id(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

#[derive(Debug, Clone, Copy)]
struct QuotaWindow {
    opened_at: Instant,
    used: usize,
}

/// Fixed-window extraction quota, counted separately per client.
///
/// Extractions drive a full page session each, so only the extraction
/// routes sit behind it.
#[derive(Debug, Clone)]
pub struct ExtractionQuota {
    per_window: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, QuotaWindow>>>,
}

impl ExtractionQuota {
    #[must_use]
    pub fn new(per_window: usize, window: Duration) -> Self {
        Self {
            per_window,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn per_minute(per_window: usize) -> Self {
        Self::new(per_window, Duration::from_secs(60))
    }

    /// Counts one extraction for `client`, or returns how long until its
    /// window reopens.
    async fn take(&self, client: &str) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;
        let now = Instant::now();
        if clients.len() >= SWEEP_THRESHOLD {
            clients.retain(|_, w| now.duration_since(w.opened_at) < self.window);
        }

        let window = clients.entry(client.to_owned()).or_insert(QuotaWindow {
            opened_at: now,
            used: 0,
        });
        let age = now.duration_since(window.opened_at);
        if age >= self.window {
            *window = QuotaWindow {
                opened_at: now,
                used: 0,
            };
        } else if window.used >= self.per_window {
            return Err(self.window - age);
        }
        window.used += 1;
        Ok(())
    }
}

/// First `x-forwarded-for` hop, else the peer address, else a shared bucket.
fn client_key(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_owned())
}

#[derive(Debug, Serialize)]
struct QuotaErrorBody {
    status: &'static str,
    error: QuotaError,
}

#[derive(Debug, Serialize)]
struct QuotaError {
    code: &'static str,
    message: &'static str,
}

/// Rejects extractions over the client's quota with 429 and `retry-after`.
pub async fn enforce_extraction_quota(
    State(quota): State<ExtractionQuota>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    if let Err(wait) = quota.take(&client).await {
        tracing::warn!(client = %client, path = %req.uri().path(), "extraction quota exceeded");
        let mut res = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(QuotaErrorBody {
                status: "error",
                error: QuotaError {
                    code: "rate_limited",
                    message: "extraction quota exceeded; retry later",
                },
            }),
        )
            .into_response();
        res.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(wait.as_secs().max(1)));
        return res;
    }
    next.run(req).await
}
