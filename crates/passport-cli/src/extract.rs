//! `extract` command: product page(s) to passport JSON.
//!
//! Each URL gets its own page session. With several URLs, failures are
//! reported per URL instead of aborting the run.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use passport_core::{parse_product_url, AppConfig, ProductPassport, ProductTarget};
use passport_scraper::{extract_product, ExtractOptions, HttpPage, StaticPage};
use serde::Serialize;
use serde_json::Value;

pub(crate) fn extract_options(config: &AppConfig) -> ExtractOptions {
    ExtractOptions {
        navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
        settle_delay_ms: config.settle_delay_ms,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractOutcome {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    passport: Option<ProductPassport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn extract_live(
    config: &AppConfig,
    target: &ProductTarget,
) -> anyhow::Result<ProductPassport> {
    let mut page = HttpPage::new(&config.user_agent)?;
    let raw = extract_product(&mut page, target, &extract_options(config)).await?;
    Ok(passport_synth::transform(&raw, None))
}

/// Extracts from a saved page served at the target URL.
pub(crate) async fn extract_saved(
    config: &AppConfig,
    target: &ProductTarget,
    html: String,
) -> anyhow::Result<ProductPassport> {
    let mut page = StaticPage::empty().with_route(target.url.as_str(), html);
    let raw = extract_product(&mut page, target, &extract_options(config)).await?;
    Ok(passport_synth::transform(&raw, None))
}

/// Runs the `extract` command.
///
/// A single URL prints its passport; several URLs print one outcome per URL.
///
/// # Errors
///
/// Returns an error for an invalid URL, for `--html` with more than one URL,
/// or when a single-URL extraction fails.
pub(crate) async fn run_extract(
    config: &AppConfig,
    urls: &[String],
    html: Option<String>,
    concurrency: usize,
) -> anyhow::Result<Value> {
    let targets = urls
        .iter()
        .map(|url| parse_product_url(url).map_err(|e| anyhow::anyhow!("{url}: {e}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    if let Some(html) = html {
        let [target] = targets.as_slice() else {
            anyhow::bail!("--html accepts exactly one URL, got {}", targets.len());
        };
        return Ok(serde_json::to_value(extract_saved(config, target, html).await?)?);
    }

    if let [target] = targets.as_slice() {
        return Ok(serde_json::to_value(extract_live(config, target).await?)?);
    }

    let outcomes: Vec<ExtractOutcome> = stream::iter(targets)
        .map(|target| async move {
            let url = target.url.to_string();
            match extract_live(config, &target).await {
                Ok(passport) => ExtractOutcome {
                    url,
                    passport: Some(passport),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "extraction failed; continuing");
                    ExtractOutcome {
                        url,
                        passport: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    tracing::info!(total = outcomes.len(), failed, "extraction run finished");
    Ok(serde_json::to_value(outcomes)?)
}
