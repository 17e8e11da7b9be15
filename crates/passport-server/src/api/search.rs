use axum::{extract::State, Extension, Json};
use passport_core::parse_listing_url;
use passport_scraper::SearchQuery;
use passport_synth::{enrich_items, CatalogItem};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_url_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchData {
    query: Option<String>,
    domain: String,
    /// Remote tier that produced the items, `None` when every tier came up empty.
    source: Option<&'static str>,
    items: Vec<CatalogItem>,
}

pub(super) async fn extract_search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let target = parse_listing_url(&body.url).map_err(|e| map_url_error(req_id.0.clone(), &e))?;
    let query = SearchQuery::from_listing(&target);

    let (source, items) = match state.fetcher.fetch(&query).await {
        Some(hit) => (Some(hit.tier), hit.items),
        None => {
            tracing::warn!(domain = %query.domain, "no search tier produced results");
            (None, Vec::new())
        }
    };

    Ok(Json(ApiResponse::success(
        SearchData {
            query: query.keyword,
            domain: query.domain,
            source,
            items: enrich_items(items),
        },
        req_id.0,
    )))
}
