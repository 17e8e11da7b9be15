use scraper::{ElementRef, Html};

use super::{parse_selector, visible_text, MAX_QUERY_MATCHES};
use crate::error::PageError;

/// Owned snapshot of one matched element.
///
/// Sub-queries re-parse the element's outer HTML as a fragment and match only
/// its descendants, like `element.querySelector` in a browser. Table-section
/// elements (`tr`, `td`) lose their context when parsed alone, so row
/// scanning goes through [`super::PageExt::evaluate`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    tag: String,
    outer_html: String,
    text: String,
    attributes: Vec<(String, String)>,
}

impl ElementHandle {
    pub(crate) fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            tag: value.name().to_owned(),
            outer_html: element.html(),
            text: visible_text(element),
            attributes: value
                .attrs()
                .map(|(name, val)| (name.to_owned(), val.to_owned()))
                .collect(),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whitespace-collapsed visible text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn outer_html(&self) -> &str {
        &self.outer_html
    }

    /// First descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Selector`] for an unparseable selector.
    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.select_descendants(selector, 1)?.into_iter().next())
    }

    /// Every descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Selector`] for an unparseable selector.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        self.select_descendants(selector, MAX_QUERY_MATCHES)
    }

    fn select_descendants(
        &self,
        selector: &str,
        limit: usize,
    ) -> Result<Vec<ElementHandle>, PageError> {
        let parsed = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.outer_html);
        let Some(own) = fragment.root_element().children().find_map(ElementRef::wrap) else {
            return Ok(Vec::new());
        };
        Ok(own
            .select(&parsed)
            .filter(|matched| matched.id() != own.id())
            .take(limit)
            .map(ElementHandle::from_element)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::select_handles;

    fn handle(html: &str, selector: &str) -> ElementHandle {
        let doc = Html::parse_document(html);
        select_handles(&doc, selector, 1)
            .expect("valid selector")
            .into_iter()
            .next()
            .expect("element present")
    }

    #[test]
    fn snapshot_collapses_text_and_skips_scripts() {
        let el = handle(
            "<div class='card'>  Organic <b>Tee</b>\n<script>var x = 1;</script></div>",
            "div.card",
        );
        assert_eq!(el.tag(), "div");
        assert_eq!(el.text(), "Organic Tee");
    }

    #[test]
    fn attr_lookup_is_case_insensitive() {
        let el = handle("<img data-Src='/a.jpg' alt='Tee'>", "img");
        assert_eq!(el.attr("data-src"), Some("/a.jpg"));
        assert_eq!(el.attr("alt"), Some("Tee"));
        assert_eq!(el.attr("missing"), None);
    }

    #[test]
    fn sub_query_finds_descendants() {
        let el = handle(
            "<div class='review'><span class='stars'>4.0 out of 5 stars</span><p>Great</p></div>",
            "div.review",
        );
        let stars = el.query_selector(".stars").unwrap().expect("stars present");
        assert_eq!(stars.text(), "4.0 out of 5 stars");
        assert_eq!(el.query_selector_all("p").unwrap().len(), 1);
    }

    #[test]
    fn sub_query_skips_the_element_itself() {
        let el = handle(
            "<div class='review'><div class='review reply'>Thanks!</div><p>Great</p></div>",
            "div.review",
        );
        let nested = el.query_selector(".review").unwrap().expect("nested review");
        assert_eq!(nested.text(), "Thanks!");
        assert_eq!(el.query_selector_all("div").unwrap().len(), 1);

        let leaf = handle("<p class='body'>Soft</p>", "p.body");
        assert!(leaf.query_selector("p").unwrap().is_none());
    }

    #[test]
    fn sub_query_rejects_bad_selector() {
        let el = handle("<div>x</div>", "div");
        assert!(matches!(
            el.query_selector("div[[["),
            Err(PageError::Selector { .. })
        ));
    }
}
