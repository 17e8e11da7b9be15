use passport_core::text::{
    parse_price, parse_rating, parse_review_count, validate_price, validate_rating,
};
use passport_core::{Retailer, SearchResultItem};
use url::Url;

use super::product::absolute_url;
use super::{finalize_items, SearchAdapter};
use crate::error::PageError;
use crate::ladder::{absent_on_error, image_reference, plausible_name, run_ladder, Locator};
use crate::page::{ElementHandle, PageHandle, Scope};

/// Selector data for one retailer's search-results page.
#[derive(Debug, Clone, Copy)]
pub struct SearchProfile {
    pub retailer: Retailer,
    /// Result card selectors, tried in order until one matches.
    pub cards: &'static [&'static str],
    /// Product link selectors inside a card.
    pub links: &'static [&'static str],
    pub name: &'static [Locator],
    pub price: &'static [Locator],
    pub rating: &'static [Locator],
    pub review_count: &'static [Locator],
    pub image: &'static [Locator],
    /// Markers of a climate/sustainability programme badge inside a card.
    pub climate_badges: &'static [&'static str],
}

/// Resolves a card link to an absolute product URL.
///
/// Sponsored redirect links carry the real target in a `url` query parameter;
/// that target is preferred when the outer link has no product identifier.
fn product_url(retailer: Retailer, page_url: &str, href: &str) -> Option<String> {
    let resolved = absolute_url(page_url, href)?;
    if retailer.product_id(&resolved).is_some() {
        return Some(resolved);
    }
    let parsed = Url::parse(&resolved).ok()?;
    let inner = parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())?;
    let inner = absolute_url(&resolved, &inner)?;
    retailer.product_id(&inner).map(|_| inner)
}

impl SearchProfile {
    fn card_link(&self, card: &ElementHandle, page_url: &str) -> Result<Option<String>, PageError> {
        for selector in self.links {
            for link in card.select_all(selector)? {
                if let Some(url) = link
                    .attr("href")
                    .and_then(|href| product_url(self.retailer, page_url, href))
                {
                    return Ok(Some(url));
                }
            }
        }
        Ok(None)
    }

    fn card_item(&self, card: &ElementHandle, page_url: &str) -> Option<SearchResultItem> {
        let url = absent_on_error("search.link", page_url, self.card_link(card, page_url))?;
        let name = absent_on_error(
            "search.name",
            page_url,
            run_ladder(card, "search.name", self.name, plausible_name),
        )?;

        let mut item = SearchResultItem::new(name, url);
        let price = absent_on_error(
            "search.price",
            page_url,
            run_ladder(card, "search.price", self.price, validate_price),
        );
        item.price_value = price.as_deref().and_then(parse_price).map(|p| p.value);
        item.price = price;

        let rating = absent_on_error(
            "search.rating",
            page_url,
            run_ladder(card, "search.rating", self.rating, validate_rating),
        );
        item.rating_value = rating.as_deref().and_then(parse_rating);
        item.rating = rating;

        item.review_count = absent_on_error(
            "search.review_count",
            page_url,
            run_ladder(card, "search.review_count", self.review_count, parse_review_count),
        );
        item.image_url = absent_on_error(
            "search.image",
            page_url,
            run_ladder(card, "search.image", self.image, image_reference),
        )
        .and_then(|src| absolute_url(page_url, &src));

        item.climate_friendly = self
            .climate_badges
            .iter()
            .any(|selector| matches!(card.select_first(selector), Ok(Some(_))));
        Some(item)
    }

    fn cards(&self, page: &dyn PageHandle) -> Result<Vec<ElementHandle>, PageError> {
        for selector in self.cards {
            let found = page.query_selector_all(selector)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}

impl SearchAdapter for SearchProfile {
    fn extract_search(&self, page: &dyn PageHandle) -> Vec<SearchResultItem> {
        let page_url = page.url().to_owned();
        let cards = absent_on_error("search.cards", &page_url, self.cards(page));
        let items: Vec<SearchResultItem> = cards
            .iter()
            .filter_map(|card| self.card_item(card, &page_url))
            .collect();
        tracing::debug!(
            retailer = %self.retailer,
            cards = cards.len(),
            items = items.len(),
            "search cards parsed"
        );
        finalize_items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_url_resolves_relative_links() {
        assert_eq!(
            product_url(
                Retailer::Amazon,
                "https://www.amazon.com/s?k=tee",
                "/Organic-Tee/dp/B0ABCDEF12/ref=sr_1_1"
            )
            .as_deref(),
            Some("https://www.amazon.com/Organic-Tee/dp/B0ABCDEF12/ref=sr_1_1")
        );
    }

    #[test]
    fn product_url_unwraps_sponsored_redirects() {
        assert_eq!(
            product_url(
                Retailer::Amazon,
                "https://www.amazon.com/s?k=tee",
                "/sspa/click?ie=UTF8&url=%2FOrganic-Tee%2Fdp%2FB0ABCDEF12%2Fref%3Dsr_1_2"
            )
            .as_deref(),
            Some("https://www.amazon.com/Organic-Tee/dp/B0ABCDEF12/ref=sr_1_2")
        );
    }

    #[test]
    fn product_url_rejects_non_product_links() {
        assert_eq!(
            product_url(Retailer::Walmart, "https://www.walmart.com/search?q=tee", "/browse/clothing"),
            None
        );
    }
}
