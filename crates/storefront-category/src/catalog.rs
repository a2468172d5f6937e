//! Listing behavior shared by catalog pages (category, brand, search).

use url::Url;

use crate::config::PageContext;
use crate::dom::{selectors, ElementRef, LocalStorage, PageDom};
use crate::error::PageError;

/// Storage key set when a sort was just submitted, so focus returns to the
/// sort selector after navigation.
pub const SORT_BY_STATUS_KEY: &str = "sortByStatus";

/// Behavior every catalog page gets for free. Pages override what they need.
pub trait CatalogBehavior: Send + Sync {
    /// Return focus to the sort selector if the previous page submitted a sort.
    fn arrange_focus_on_sort_by(&self, dom: &dyn PageDom, storage: &dyn LocalStorage) {
        if storage.get_item(SORT_BY_STATUS_KEY).is_some() {
            dom.focus(&ElementRef::css(selectors::SORT_BY_SELECT));
            storage.remove_item(SORT_BY_STATUS_KEY);
        }
    }

    /// Navigate to `current_url` re-sorted by `field=value`, back on the
    /// first page.
    fn on_sort_by_submit(
        &self,
        dom: &dyn PageDom,
        storage: &dyn LocalStorage,
        current_url: &Url,
        field: &str,
        value: &str,
    ) -> Result<Url, PageError> {
        let target = sorted_url(current_url, field, value)?;

        if storage.is_available() {
            if let Err(error) = storage.set_item(SORT_BY_STATUS_KEY, "selected") {
                tracing::warn!(error = %error, "could not remember sort submission");
            }
        }

        tracing::debug!(url = %target, "navigating to sorted listing");
        dom.navigate(&target);
        Ok(target)
    }

    /// Wire up the product compare widget. Does nothing unless overridden.
    fn init_compare_products(&self, _context: &PageContext) {}
}

/// Catalog behavior with nothing overridden.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCatalog;

impl CatalogBehavior for DefaultCatalog {}

/// Rebuild the listing URL with `field` set to `value` and pagination reset.
/// An existing `field` keeps its position in the query; the fragment is dropped.
pub fn sorted_url(current_url: &Url, field: &str, value: &str) -> Result<Url, PageError> {
    if field.is_empty() {
        return Err(PageError::Url("sort field is empty".to_string()));
    }

    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, existing) in current_url.query_pairs() {
        if key == "page" {
            continue;
        }
        if key == field {
            if !replaced {
                pairs.push((key.into_owned(), value.to_string()));
                replaced = true;
            }
            continue;
        }
        pairs.push((key.into_owned(), existing.into_owned()));
    }
    if !replaced {
        pairs.push((field.to_string(), value.to_string()));
    }

    let mut target = current_url.clone();
    target.set_fragment(None);
    target.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStorage, RecordingDom};
    use rstest::rstest;

    #[rstest]
    #[case("https://shop.test/shoes/", "https://shop.test/shoes/?sort=newest")]
    #[case(
        "https://shop.test/shoes/?page=3&sort=featured",
        "https://shop.test/shoes/?sort=newest"
    )]
    #[case(
        "https://shop.test/shoes/?sort=featured&limit=24#top",
        "https://shop.test/shoes/?sort=newest&limit=24"
    )]
    #[case(
        "https://shop.test/shoes/?limit=24&page=2",
        "https://shop.test/shoes/?limit=24&sort=newest"
    )]
    fn test_sorted_url(#[case] current: &str, #[case] expected: &str) {
        let current = Url::parse(current).unwrap();
        assert_eq!(sorted_url(&current, "sort", "newest").unwrap().as_str(), expected);
    }

    #[test]
    fn test_sorted_url_rejects_empty_field() {
        let current = Url::parse("https://shop.test/shoes/").unwrap();
        assert!(matches!(sorted_url(&current, "", "x"), Err(PageError::Url(_))));
    }

    #[test]
    fn test_sort_submit_navigates_and_remembers() {
        let dom = RecordingDom::default();
        let storage = MemoryStorage::default();
        let current = Url::parse("https://shop.test/shoes/?page=4").unwrap();

        let target = DefaultCatalog
            .on_sort_by_submit(&dom, &storage, &current, "sort", "priceasc")
            .unwrap();

        assert_eq!(target.as_str(), "https://shop.test/shoes/?sort=priceasc");
        assert_eq!(dom.navigations(), vec![target]);
        assert_eq!(storage.get_item(SORT_BY_STATUS_KEY).as_deref(), Some("selected"));
    }

    #[test]
    fn test_focus_returns_to_sort_selector_once() {
        let dom = RecordingDom::default();
        let storage = MemoryStorage::default();
        storage.set_item(SORT_BY_STATUS_KEY, "selected").unwrap();

        DefaultCatalog.arrange_focus_on_sort_by(&dom, &storage);
        DefaultCatalog.arrange_focus_on_sort_by(&dom, &storage);

        assert_eq!(dom.focused(), vec![ElementRef::css(selectors::SORT_BY_SELECT)]);
        assert_eq!(storage.get_item(SORT_BY_STATUS_KEY), None);
    }
}
