//! Structured-scrape job tier.
//!
//! A job is triggered per dataset + keyword. The trigger either answers with
//! the records directly or with a `snapshot_id` that is polled a bounded
//! number of times; a job that is still running after the last poll is
//! reported as [`TierOutcome::Pending`].

use std::time::Duration;

use async_trait::async_trait;
use passport_core::text::{parse_price, parse_rating, parse_review_count};
use passport_core::{SearchResultItem, StructuredScrapeConfig};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::{read_json, SearchQuery, SearchTier, TierOutcome};
use crate::adapters::finalize_items;
use crate::error::RemoteError;
use crate::jsonld::currency_symbol;

const NAME_FIELDS: &[&str] = &["title", "name", "product_name", "product_title"];
const URL_FIELDS: &[&str] = &["url", "product_url", "link", "productUrl"];
const PRICE_FIELDS: &[&str] = &["final_price", "price", "initial_price", "current_price"];
const RATING_FIELDS: &[&str] = &["rating", "stars", "average_rating", "rating_value"];
const REVIEW_COUNT_FIELDS: &[&str] = &[
    "reviews_count",
    "review_count",
    "ratings_count",
    "num_reviews",
];
const IMAGE_FIELDS: &[&str] = &["image", "image_url", "main_image", "thumbnail", "images"];
const CURRENCY_FIELDS: &[&str] = &["currency", "price_currency"];

const PENDING_STATUSES: &[&str] = &["running", "building", "pending", "collecting", "starting"];

pub struct StructuredScrapeTier {
    client: Client,
    config: StructuredScrapeConfig,
}

/// What a trigger or poll response carried.
enum JobState {
    Records(Vec<Value>),
    Snapshot(String),
    Running,
}

impl StructuredScrapeTier {
    #[must_use]
    pub fn new(client: Client, config: StructuredScrapeConfig) -> Self {
        Self { client, config }
    }

    async fn trigger(&self, dataset: &str, query: &SearchQuery, keyword: &str) -> Result<JobState, RemoteError> {
        let url = format!(
            "{}/datasets/{dataset}/trigger",
            self.config.endpoint.base_url
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.endpoint.api_key)
            .json(&json!([{ "keyword": keyword, "url": query.listing_url }]))
            .send()
            .await?;
        let body = read_json(response, &format!("scrape trigger for dataset {dataset}")).await?;
        Ok(job_state(body))
    }

    async fn poll(&self, snapshot_id: &str) -> Result<JobState, RemoteError> {
        let url = format!("{}/snapshots/{snapshot_id}", self.config.endpoint.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.endpoint.api_key)
            .send()
            .await?;
        if response.status() == StatusCode::ACCEPTED {
            return Ok(JobState::Running);
        }
        let body = read_json(response, &format!("scrape snapshot {snapshot_id}")).await?;
        Ok(job_state(body))
    }
}

#[async_trait]
impl SearchTier for StructuredScrapeTier {
    fn name(&self) -> &'static str {
        "structured_scrape"
    }

    async fn search(&self, query: &SearchQuery) -> Result<TierOutcome, RemoteError> {
        let dataset = query
            .retailer
            .and_then(|retailer| self.config.dataset_for(retailer))
            .ok_or(RemoteError::NotConfigured("structured_scrape"))?;
        let keyword = query
            .keyword
            .as_deref()
            .ok_or(RemoteError::NotConfigured("structured_scrape"))?;

        let snapshot_id = match self.trigger(dataset, query, keyword).await? {
            JobState::Records(records) => return Ok(TierOutcome::Items(map_records(&records))),
            JobState::Snapshot(id) => id,
            JobState::Running => return Ok(TierOutcome::Pending),
        };
        tracing::debug!(dataset, snapshot_id = %snapshot_id, "scrape job triggered");

        for attempt in 1..=self.config.poll_attempts {
            tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
            match self.poll(&snapshot_id).await? {
                JobState::Records(records) => {
                    return Ok(TierOutcome::Items(map_records(&records)));
                }
                JobState::Snapshot(_) | JobState::Running => {
                    tracing::debug!(snapshot_id = %snapshot_id, attempt, "scrape job not ready");
                }
            }
        }
        Ok(TierOutcome::Pending)
    }
}

fn job_state(body: Value) -> JobState {
    match body {
        Value::Array(records) => JobState::Records(records),
        Value::Object(mut map) => {
            for key in ["data", "results", "records"] {
                if let Some(Value::Array(records)) = map.remove(key) {
                    return JobState::Records(records);
                }
            }
            let running = map
                .get("status")
                .and_then(Value::as_str)
                .is_some_and(|status| PENDING_STATUSES.contains(&status.to_ascii_lowercase().as_str()));
            if running {
                return JobState::Running;
            }
            match map.get("snapshot_id").and_then(Value::as_str) {
                Some(id) => JobState::Snapshot(id.to_owned()),
                None => JobState::Records(Vec::new()),
            }
        }
        _ => JobState::Records(Vec::new()),
    }
}

/// First present, non-null field among `names`.
fn resolve<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .find(|value| !value.is_null())
}

fn resolve_text(record: &Value, names: &[&str]) -> Option<String> {
    let text = match resolve(record, names)? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().find_map(Value::as_str)?.trim().to_owned(),
        Value::Object(map) => map
            .get("url")
            .or_else(|| map.get("value"))
            .and_then(Value::as_str)?
            .trim()
            .to_owned(),
        Value::Bool(_) | Value::Null => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn record_item(record: &Value) -> Option<SearchResultItem> {
    let name = resolve_text(record, NAME_FIELDS)?;
    let url = resolve_text(record, URL_FIELDS)?;
    let mut item = SearchResultItem::new(name, url);

    if let Some(raw) = resolve_text(record, PRICE_FIELDS) {
        let text = if raw.starts_with(|c: char| c.is_ascii_digit()) {
            let code = resolve_text(record, CURRENCY_FIELDS).unwrap_or_default();
            format!("{}{raw}", currency_symbol(&code))
        } else {
            raw
        };
        if let Some(price) = parse_price(&text) {
            item.price_value = Some(price.value);
            item.price = Some(price.text);
        }
    }
    if let Some(raw) = resolve_text(record, RATING_FIELDS) {
        item.rating_value = parse_rating(&raw);
        item.rating = item.rating_value.map(|r| format!("{r} out of 5 stars"));
    }
    item.review_count = resolve_text(record, REVIEW_COUNT_FIELDS)
        .and_then(|raw| parse_review_count(&raw));
    item.image_url = resolve_text(record, IMAGE_FIELDS);
    Some(item)
}

/// Maps loosely-typed records through the field-synonym tables; records
/// without a name or URL are dropped.
fn map_records(records: &[Value]) -> Vec<SearchResultItem> {
    finalize_items(records.iter().filter_map(record_item).collect())
}
