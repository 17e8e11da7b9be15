use async_trait::async_trait;
use passport_core::text::{parse_review_count, validate_price, validate_rating};
use passport_core::{ProductImages, RawExtractedProduct, Retailer, UNKNOWN_PRODUCT_NAME};
use url::Url;

use super::reviews::locate_reviews;
use super::{ExtractOptions, ProductAdapter};
use crate::ladder::{
    absent_on_error, image_reference, plausible_description, plausible_name, run_ladder, Locator,
    Validate,
};
use crate::page::PageHandle;
use crate::signals::{extract_signals, SignalProfile};

/// Where one retailer keeps its reviews.
#[derive(Debug, Clone, Copy)]
pub struct ReviewProfile {
    /// Review container selectors, tried in order until one matches.
    pub blocks: &'static [&'static str],
    /// Body text ladder, run inside each container.
    pub text: &'static [Locator],
    /// Star rating ladder, run inside each container.
    pub rating: &'static [Locator],
    /// Verified-purchase badge selectors inside a container.
    pub verified: &'static [&'static str],
    /// Section to scroll to when no review is rendered inline.
    pub anchor: Option<&'static str>,
    /// Seller-feedback style: entries carry no star rating and are kept
    /// without one.
    pub feedback_style: bool,
}

/// Selector data for one retailer's product page.
#[derive(Debug, Clone, Copy)]
pub struct ProductProfile {
    pub retailer: Retailer,
    pub name: &'static [Locator],
    pub price: &'static [Locator],
    pub rating: &'static [Locator],
    pub review_count: &'static [Locator],
    pub description: &'static [Locator],
    pub image: &'static [Locator],
    pub reviews: ReviewProfile,
    pub signals: SignalProfile,
}

/// Resolves a root-relative image path against the page URL.
pub(crate) fn absolute_url(page_url: &str, reference: &str) -> Option<String> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Some(reference.to_owned());
    }
    Url::parse(page_url)
        .and_then(|base| base.join(reference))
        .map(String::from)
        .ok()
}

impl ProductProfile {
    fn field(
        &self,
        page: &dyn PageHandle,
        field: &'static str,
        locators: &[Locator],
        validate: Validate,
    ) -> Option<String> {
        absent_on_error(field, page.url(), run_ladder(page, field, locators, validate))
    }

    /// Every single-valued field plus sustainability signals, each behind its
    /// own failure boundary. Reviews are left empty.
    pub fn extract_fields(&self, page: &dyn PageHandle) -> RawExtractedProduct {
        let url = page.url().to_owned();
        let mut product = RawExtractedProduct::empty(url.clone());

        if let Some(name) = self.field(page, "name", self.name, plausible_name) {
            product.name = name;
        }
        product.price = self.field(page, "price", self.price, validate_price);
        product.rating = self.field(page, "rating", self.rating, validate_rating);
        product.review_count =
            self.field(page, "review_count", self.review_count, parse_review_count);
        product.description =
            self.field(page, "description", self.description, plausible_description);
        product.images = ProductImages {
            main: self
                .field(page, "image", self.image, image_reference)
                .and_then(|src| absolute_url(&url, &src)),
        };

        let signals = extract_signals(page, &self.signals);
        product.materials = signals.materials;
        product.certifications = signals.certifications;
        product.origin = signals.origin;
        product.sustainability_badges = signals.badges;

        if product.name == UNKNOWN_PRODUCT_NAME {
            tracing::warn!(url, retailer = %self.retailer, "no name strategy matched");
        }
        product
    }
}

#[async_trait]
impl ProductAdapter for ProductProfile {
    fn retailer(&self) -> Retailer {
        self.retailer
    }

    async fn extract(
        &self,
        page: &mut dyn PageHandle,
        options: &ExtractOptions,
    ) -> RawExtractedProduct {
        let mut product = self.extract_fields(page);
        let product_id = self.retailer.product_id(&product.source_url);
        // Reviews go last: the fallback may navigate to a reviews page.
        product.reviews = locate_reviews(
            page,
            &self.reviews,
            self.retailer,
            product_id.as_deref(),
            options,
        )
        .await;
        tracing::debug!(
            url = %product.source_url,
            price = product.price.is_some(),
            rating = product.rating.is_some(),
            reviews = product.reviews.len(),
            materials = product.materials.len(),
            "product fields extracted"
        );
        product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_joins_root_relative_paths() {
        assert_eq!(
            absolute_url("https://www.target.com/p/tee/-/A-12345678", "/img/tee.jpg").as_deref(),
            Some("https://www.target.com/img/tee.jpg")
        );
        assert_eq!(
            absolute_url("https://www.target.com/p/x", "https://cdn.example.com/a.jpg").as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }
}
