use std::path::Path;

use axum::{
    extract::{Path as UrlPath, State},
    Extension, Json,
};
use chrono::Utc;
use passport_core::{parse_product_url, ProductPassport};
use passport_scraper::capture_product;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    map_extraction_error, map_url_error, ApiError, ApiResponse, AppState, CachedPassport,
};

#[derive(Debug, Deserialize)]
pub(super) struct ExtractRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ExtractedPassport {
    id: Uuid,
    passport: ProductPassport,
}

/// Writes the landing HTML to `<dir>/<passport id>.html`.
async fn write_snapshot(dir: &Path, id: Uuid, html: &str) -> std::io::Result<String> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{id}.html"));
    tokio::fs::write(&path, html).await?;
    Ok(path.to_string_lossy().into_owned())
}

pub(super) async fn extract_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ExtractRequest>,
) -> Result<Json<ApiResponse<ExtractedPassport>>, ApiError> {
    let target = parse_product_url(&body.url).map_err(|e| map_url_error(req_id.0.clone(), &e))?;
    let options = state.extract_options();

    let snapshot_dir = state.config.snapshot_dir.as_deref();

    let mut page = (state.pages)().map_err(|e| map_extraction_error(req_id.0.clone(), &e))?;
    let capture = capture_product(page.as_mut(), &target, &options, snapshot_dir.is_some())
        .await
        .map_err(|e| map_extraction_error(req_id.0.clone(), &e))?;
    drop(page);

    let id = Uuid::new_v4();
    let snapshot_path = match (snapshot_dir, capture.landing_html.as_deref()) {
        (Some(dir), Some(html)) => match write_snapshot(dir, id, html).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, dir = %dir.display(), "failed to write page snapshot");
                None
            }
        },
        _ => None,
    };

    let passport = passport_synth::transform_with_id(id, &capture.product, snapshot_path);
    state
        .passports
        .set(
            id,
            CachedPassport {
                passport: passport.clone(),
                cached_at: Utc::now(),
            },
        )
        .await;
    tracing::info!(%id, name = %passport.name, "passport stored");

    Ok(Json(ApiResponse::success(
        ExtractedPassport { id, passport },
        req_id.0,
    )))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<ApiResponse<CachedPassport>>, ApiError> {
    let not_found = || ApiError::new(req_id.0.clone(), "not_found", "passport not found");
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let cached = state.passports.get(&id).await.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::success(cached, req_id.0)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::api::build_app;
    use crate::api::test_support::{static_pages, test_config, test_state};
    use crate::middleware::ExtractionQuota;

    const PRODUCT_URL: &str = "https://www.amazon.com/dp/B0ABCDEF12";

    const PRODUCT_HTML: &str = r#"<html><body>
      <span id="productTitle">Organic Cotton Tee</span>
      <span class="a-price"><span class="a-offscreen">$24.99</span></span>
      <div id="feature-bullets"><ul><li>100% Organic Cotton</li></ul></div>
    </body></html>"#;

    fn app_with(routes: &[(&str, &str)], snapshot_dir: Option<std::path::PathBuf>) -> Router {
        let routes: HashMap<String, String> = routes
            .iter()
            .map(|(u, h)| ((*u).to_string(), (*h).to_string()))
            .collect();
        let mut config = test_config();
        config.snapshot_dir = snapshot_dir;
        build_app(
            test_state(static_pages(routes), Vec::new(), config),
            ExtractionQuota::per_minute(100),
        )
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[tokio::test]
    async fn unsupported_url_is_bad_request_with_domains() {
        let app = app_with(&[], None);
        let response = app
            .oneshot(post_json(
                "/products/extract",
                serde_json::json!({ "url": "https://shop.example.org/item/1" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "bad_request");
        assert!(json["error"]["supportedDomains"].is_array());
    }

    #[tokio::test]
    async fn navigation_failure_is_retryable_server_error() {
        let app = app_with(&[], None);
        let response = app
            .oneshot(post_json(
                "/products/extract",
                serde_json::json!({ "url": PRODUCT_URL }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "extraction_failed");
        assert_eq!(json["error"]["canRetry"], true);
    }

    #[tokio::test]
    async fn extracted_passport_is_cached_and_retrievable() {
        let app = app_with(&[(PRODUCT_URL, PRODUCT_HTML)], None);
        let response = app
            .clone()
            .oneshot(post_json(
                "/products/extract",
                serde_json::json!({ "url": PRODUCT_URL }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["passport"]["name"], "Organic Cotton Tee");
        assert_eq!(json["data"]["passport"]["price"], "$24.99");
        assert!(json["data"]["passport"]["sourceSnapshotPath"].is_null());
        let id = json["data"]["id"].as_str().expect("id").to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/products/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["passport"]["id"], id.as_str());
        assert!(json["data"]["cachedAt"].is_string());
    }

    #[tokio::test]
    async fn snapshot_written_when_directory_configured() {
        let dir = std::env::temp_dir().join(format!("passport-snapshots-{}", uuid::Uuid::new_v4()));
        let app = app_with(&[(PRODUCT_URL, PRODUCT_HTML)], Some(dir.clone()));
        let response = app
            .oneshot(post_json(
                "/products/extract",
                serde_json::json!({ "url": PRODUCT_URL }),
            ))
            .await
            .expect("response");
        let json = json_body(response).await;
        let id = json["data"]["id"].as_str().expect("id");
        let path = json["data"]["passport"]["sourceSnapshotPath"]
            .as_str()
            .expect("snapshot path");
        assert_eq!(
            std::path::Path::new(path).file_name().and_then(|n| n.to_str()),
            Some(format!("{id}.html").as_str()),
            "snapshot is named after the passport"
        );
        let saved = std::fs::read_to_string(path).expect("snapshot file");
        assert!(saved.contains("productTitle"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
            let response = app_with(&[], None)
                .oneshot(
                    Request::builder()
                        .uri(format!("/products/{id}"))
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }
}
