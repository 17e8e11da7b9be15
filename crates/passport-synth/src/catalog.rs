use passport_core::{ReturnRisk, SearchResultItem};
use serde::{Deserialize, Serialize};

use crate::fallback::{fallback_sustainability_score, generate_return_risk};

/// A search result with a seeded return-risk preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(flatten)]
    pub item: SearchResultItem,
    pub return_risk: ReturnRisk,
}

/// Adds a return-risk preview to every item and fills in a seeded
/// sustainability score where the source had none.
#[must_use]
pub fn enrich_items(items: Vec<SearchResultItem>) -> Vec<CatalogItem> {
    items
        .into_iter()
        .map(|mut item| {
            if item.sustainability_score.is_none() {
                item.sustainability_score = Some(fallback_sustainability_score(&item.name));
            }
            let return_risk = generate_return_risk(&item.name, item.rating.as_deref());
            CatalogItem { item, return_risk }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_source_score_and_fills_missing_one() {
        let mut scored = SearchResultItem::new("Hemp Tote", "https://shop.example/products/tote");
        scored.sustainability_score = Some(91);
        let unscored = SearchResultItem::new("Poly Jacket", "https://shop.example/products/jacket");

        let enriched = enrich_items(vec![scored, unscored]);
        assert_eq!(enriched[0].item.sustainability_score, Some(91));
        assert_eq!(
            enriched[1].item.sustainability_score,
            Some(fallback_sustainability_score("Poly Jacket"))
        );
    }

    #[test]
    fn serializes_flat() {
        let item = SearchResultItem::new("Hemp Tote", "https://shop.example/products/tote");
        let json = serde_json::to_value(enrich_items(vec![item])).expect("serialize");
        assert_eq!(json[0]["name"], "Hemp Tote");
        assert_eq!(json[0]["productUrl"], "https://shop.example/products/tote");
        assert!(json[0]["returnRisk"]["score"].is_number());
        assert!(json[0]["sustainabilityScore"].is_number());
    }
}
