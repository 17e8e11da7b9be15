mod products;
mod search;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use passport_core::{supported_domains, AppConfig, ProductPassport, Store, UrlError};
use passport_scraper::{ExtractOptions, ExtractionError, HttpPage, PageHandle, RemoteFetcher};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::middleware::{
    enforce_extraction_quota, request_id, ExtractionQuota, RequestId, REQUEST_ID_HEADER,
};

/// Opens a fresh page session for one extraction request.
pub type PageFactory =
    Arc<dyn Fn() -> Result<Box<dyn PageHandle>, ExtractionError> + Send + Sync>;

pub type PassportStore = Arc<dyn Store<Uuid, CachedPassport>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub passports: PassportStore,
    pub fetcher: Arc<RemoteFetcher>,
    pub pages: PageFactory,
}

impl AppState {
    pub(super) fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            navigation_timeout: Duration::from_secs(self.config.navigation_timeout_secs),
            settle_delay_ms: self.config.settle_delay_ms,
        }
    }
}

/// A stored passport and when it was stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPassport {
    pub passport: ProductPassport,
    pub cached_at: DateTime<Utc>,
}

/// Live HTTP sessions with the configured user agent.
pub fn http_page_factory(user_agent: String) -> PageFactory {
    Arc::new(move || {
        HttpPage::new(&user_agent)
            .map(|page| Box::new(page) as Box<dyn PageHandle>)
            .map_err(|e| ExtractionError::Session(e.to_string()))
    })
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn success(data: T, request_id: String) -> Self {
        Self {
            status: "success",
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: &'static str,
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_domains: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_retry: Option<bool>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: "error",
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                supported_domains: None,
                can_retry: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_url_error(request_id: String, error: &UrlError) -> ApiError {
    tracing::info!(error = %error, "rejected URL");
    let mut api_error = ApiError::new(request_id, "bad_request", error.to_string());
    api_error.error.supported_domains = Some(supported_domains());
    api_error
}

pub(super) fn map_extraction_error(request_id: String, error: &ExtractionError) -> ApiError {
    tracing::error!(error = %error, "product extraction failed");
    let mut api_error = ApiError::new(request_id, "extraction_failed", error.to_string());
    api_error.error.can_retry = Some(true);
    api_error
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn extraction_router(quota: ExtractionQuota) -> Router<AppState> {
    Router::new()
        .route("/products/extract", post(products::extract_product))
        .route("/search/extract", post(search::extract_search))
        .layer(axum::middleware::from_fn_with_state(
            quota,
            enforce_extraction_quota,
        ))
}

pub fn build_app(state: AppState, quota: ExtractionQuota) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/products/{id}", get(products::get_product));

    Router::new()
        .merge(public_routes)
        .merge(extraction_router(quota))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::success(
        HealthData {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
        req_id.0,
    ))
}
