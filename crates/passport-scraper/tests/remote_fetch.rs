//! Integration tests for the HTTP-backed page and the remote search tiers.
//!
//! Every collaborator is a `wiremock` server; no real network traffic is made.

use std::time::Duration;

use passport_core::{parse_listing_url, Retailer, StructuredScrapeConfig, VendorEndpoint};
use passport_scraper::{
    extract_listing, navigate, ExtractOptions, ExtractionError, HttpPage, PageError,
    RawHtmlTier, RemoteError, RemoteFetcher, SearchQuery, SearchTier, StructuredScrapeTier,
    TierOutcome, WebSearchTier,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn endpoint(server: &MockServer) -> VendorEndpoint {
    VendorEndpoint {
        base_url: server.uri(),
        api_key: API_KEY.to_string(),
    }
}

fn scrape_config(server: &MockServer, poll_attempts: u32) -> StructuredScrapeConfig {
    StructuredScrapeConfig {
        endpoint: endpoint(server),
        datasets: vec![(Retailer::Amazon, "gd_amazon".to_string())],
        poll_attempts,
        poll_interval_ms: 5,
    }
}

fn amazon_query(listing_url: String) -> SearchQuery {
    SearchQuery {
        retailer: Some(Retailer::Amazon),
        domain: "amazon.com".to_string(),
        keyword: Some("organic tee".to_string()),
        listing_url,
    }
}

fn options(timeout: Duration) -> ExtractOptions {
    ExtractOptions {
        navigation_timeout: timeout,
        settle_delay_ms: 0,
    }
}

const AMAZON_SEARCH_HTML: &str = r#"<html><body>
  <div data-component-type="s-search-result">
    <h2><a href="/Organic-Tee/dp/B0ABCDEF12"><span>Organic Tee</span></a></h2>
    <span class="a-price"><span class="a-offscreen">$19.99</span></span>
  </div>
</body></html>"#;

// ---------------------------------------------------------------------------
// HttpPage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn http_page_loads_listing_and_runs_generic_adapter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ul><li><a href="/products/hemp-tote"><h3>Hemp Tote</h3></a> $18.00</li></ul>"#,
        ))
        .mount(&server)
        .await;

    let target = parse_listing_url(&format!("{}/search?q=tote", server.uri())).expect("url");
    let mut page = HttpPage::new("passport-test/0.1").expect("client");
    let items = extract_listing(&mut page, &target, &options(Duration::from_secs(5)))
        .await
        .expect("listing");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Hemp Tote");
    assert_eq!(
        items[0].product_url,
        format!("{}/products/hemp-tote", server.uri())
    );
}

#[tokio::test]
async fn http_page_error_status_is_a_navigation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut page = HttpPage::new("passport-test/0.1").expect("client");
    let err = navigate(&mut page, &server.uri(), &options(Duration::from_secs(5)))
        .await
        .expect_err("503 must fail navigation");

    match err {
        ExtractionError::Navigation(PageError::Navigation { reason, .. }) => {
            assert!(reason.contains("503"), "reason was {reason}");
        }
        other => panic!("expected navigation error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_page_times_out_slow_navigation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut page = HttpPage::new("passport-test/0.1").expect("client");
    let err = navigate(&mut page, &server.uri(), &options(Duration::from_millis(50)))
        .await
        .expect_err("slow page must time out");

    assert!(matches!(
        err,
        ExtractionError::Navigation(PageError::Timeout { .. })
    ));
}

// ---------------------------------------------------------------------------
// Structured scrape tier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn structured_tier_polls_until_records_arrive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/datasets/gd_amazon/trigger"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s_42" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/snapshots/s_42"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/snapshots/s_42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "title": "Organic Tee",
                "url": "https://www.amazon.com/dp/B0ABCDEF12",
                "final_price": "19.99",
                "rating": 4.4,
                "reviews_count": 812
            },
            { "title": "No URL record" }
        ])))
        .mount(&server)
        .await;

    let tier = StructuredScrapeTier::new(reqwest::Client::new(), scrape_config(&server, 3));
    let outcome = tier
        .search(&amazon_query("https://www.amazon.com/s?k=organic+tee".to_string()))
        .await
        .expect("tier result");

    let TierOutcome::Items(items) = outcome else {
        panic!("expected items, got {outcome:?}");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Organic Tee");
    assert_eq!(items[0].price.as_deref(), Some("$19.99"));
    assert_eq!(items[0].review_count.as_deref(), Some("(812)"));
}

#[tokio::test]
async fn structured_tier_reports_pending_after_last_poll() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/datasets/gd_amazon/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s_1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/snapshots/s_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .expect(2)
        .mount(&server)
        .await;

    let tier = StructuredScrapeTier::new(reqwest::Client::new(), scrape_config(&server, 2));
    let outcome = tier
        .search(&amazon_query("https://www.amazon.com/s?k=organic+tee".to_string()))
        .await
        .expect("tier result");

    assert_eq!(outcome, TierOutcome::Pending);
}

#[tokio::test]
async fn structured_tier_skips_retailers_without_dataset() {
    let server = MockServer::start().await;
    let tier = StructuredScrapeTier::new(reqwest::Client::new(), scrape_config(&server, 1));
    let mut query = amazon_query("https://www.walmart.com/search?q=tee".to_string());
    query.retailer = Some(Retailer::Walmart);

    let err = tier.search(&query).await.expect_err("no dataset");
    assert!(matches!(err, RemoteError::NotConfigured("structured_scrape")));
}

// ---------------------------------------------------------------------------
// Raw HTML tier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn raw_html_tier_goes_through_unlocker_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AMAZON_SEARCH_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let tier = RawHtmlTier::new(reqwest::Client::new(), Some(endpoint(&server)));
    let outcome = tier
        .search(&amazon_query("https://www.amazon.com/s?k=organic+tee".to_string()))
        .await
        .expect("tier result");

    let TierOutcome::Items(items) = outcome else {
        panic!("expected items, got {outcome:?}");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].product_url,
        "https://www.amazon.com/Organic-Tee/dp/B0ABCDEF12"
    );
    assert_eq!(items[0].price_value, Some(19.99));
}

#[tokio::test]
async fn raw_html_tier_surfaces_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let tier = RawHtmlTier::new(reqwest::Client::new(), None);
    let err = tier
        .search(&amazon_query(format!("{}/s?k=organic+tee", server.uri())))
        .await
        .expect_err("403");
    assert!(matches!(err, RemoteError::UnexpectedStatus { status: 403, .. }));
}

// ---------------------------------------------------------------------------
// Web search tier
// ---------------------------------------------------------------------------

#[tokio::test]
async fn web_search_tier_keeps_only_product_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "site:walmart.com hemp tote"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                {
                    "title": "Hemp Tote Bag - Walmart.com",
                    "link": "https://www.walmart.com/ip/Hemp-Tote-Bag/123456789",
                    "snippet": "Reusable hemp tote, $18.40"
                },
                {
                    "title": "Bags - Walmart.com",
                    "link": "https://www.walmart.com/browse/bags/0_123"
                },
                {
                    "title": "Hemp tote review",
                    "link": "https://blog.example.com/hemp-tote"
                }
            ]
        })))
        .mount(&server)
        .await;

    let tier = WebSearchTier::new(reqwest::Client::new(), endpoint(&server));
    let query = SearchQuery {
        retailer: Some(Retailer::Walmart),
        domain: "walmart.com".to_string(),
        keyword: Some("hemp tote".to_string()),
        listing_url: "https://www.walmart.com/search?q=hemp+tote".to_string(),
    };
    let TierOutcome::Items(items) = tier.search(&query).await.expect("tier result") else {
        panic!("expected items");
    };

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Hemp Tote Bag - Walmart.com");
    assert_eq!(items[0].price.as_deref(), Some("$18.40"));
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetcher_escalates_from_failed_scrape_to_raw_html() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/datasets/gd_amazon/trigger"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(AMAZON_SEARCH_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let fetcher = RemoteFetcher::new(vec![
        Box::new(StructuredScrapeTier::new(
            client.clone(),
            scrape_config(&server, 1),
        )),
        Box::new(RawHtmlTier::new(client, None)),
    ]);
    let hit = fetcher
        .fetch(&amazon_query(format!("{}/s?k=organic+tee", server.uri())))
        .await
        .expect("raw html tier produced items");

    assert_eq!(hit.tier, "raw_html");
    assert_eq!(hit.items.len(), 1);
    assert_eq!(hit.items[0].name, "Organic Tee");
}
