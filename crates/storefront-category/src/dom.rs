//! Ports to the browser page.
//!
//! The controller never queries a live document. It reads a
//! [`PageSnapshot`](crate::PageSnapshot) and writes through these traits, which
//! the host implements over its DOM, modal and storage primitives.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::PageError;

/// Selectors the page markup is expected to use.
pub mod selectors {
    /// Any element carrying a product id; each one is an addable item.
    pub const PRODUCT_ID: &str = "[data-product-id]";
    pub const PRODUCT_ID_ATTR: &str = "data-product-id";
    pub const CART_ID_ATTR: &str = "data-cart-id";
    pub const ADD_ALL_CART: &str = ".add-all-cart";
    pub const REMOVE_ALL_CART: &str = ".remove-all-cart";
    pub const ADD_TO_CART_BUTTON: &str = "[data-button-type=\"add-cart\"]";
    pub const FACETED_SEARCH: &str = "#facetedSearch";
    pub const PRODUCT_LISTING_CONTAINER: &str = "#product-listing-container";
    pub const FACETED_SEARCH_CONTAINER: &str = "#faceted-search-container";
    pub const NO_PRODUCTS_NOTIFICATION: &str = "[data-no-products-notification]";
    pub const SHOP_BY_PRICE: &str = "[data-shop-by-price]";
    pub const PRICE_FILTER_LINK: &str = "a.navList-action";
    pub const ACTIVE_PRICE_FILTER_LINK: &str = "a.navList-action.is-active";
    pub const PRICE_FILTER_MESSAGE: &str = "span.price-filter-message";
    pub const RESET_BUTTON: &str = "a.reset-btn";
    pub const RESET_MESSAGE: &str = "span.reset-message";
    pub const CART_QUANTITY_BADGE: &str = ".cart-quantity";
    pub const SORT_BY_SELECT: &str = "[data-sort-by=\"product\"] #sort";
}

/// Class toggled on the quantity badge when the cart is cleared.
pub const COUNT_PILL_CLASS: &str = "countPill";

/// Reference to one element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementRef {
    /// First element matching a CSS selector.
    Css(String),
    /// The element immediately after another one.
    NextSibling(Box<ElementRef>),
}

impl ElementRef {
    pub fn css(selector: impl Into<String>) -> Self {
        ElementRef::Css(selector.into())
    }

    pub fn next_sibling(self) -> Self {
        ElementRef::NextSibling(Box::new(self))
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Css(selector) => f.write_str(selector),
            ElementRef::NextSibling(inner) => write!(f, "{} + *", inner),
        }
    }
}

/// Broadcasts other page components listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSignal {
    /// Listing content was replaced; compare selections are stale.
    CompareReset,
}

impl PageSignal {
    pub fn name(&self) -> &'static str {
        match self {
            PageSignal::CompareReset => "compareReset",
        }
    }
}

/// Hook names the page can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageHook {
    SortBySubmitted,
}

impl PageHook {
    pub fn name(&self) -> &'static str {
        match self {
            PageHook::SortBySubmitted => "sortBy-submitted",
        }
    }
}

/// Writes to the live document.
pub trait PageDom: Send + Sync {
    fn set_attribute(&self, target: &ElementRef, name: &str, value: &str);

    fn set_text(&self, target: &ElementRef, text: &str);

    fn toggle_class(&self, target: &ElementRef, class: &str);

    fn replace_html(&self, target: &ElementRef, html: &str);

    fn focus(&self, target: &ElementRef);

    fn emit(&self, signal: PageSignal);

    fn subscribe(&self, hook: PageHook);

    fn scroll_to_top(&self, duration: Duration);

    /// Reload the whole page once `delay` has elapsed. Not cancellable.
    fn schedule_reload(&self, delay: Duration);

    fn navigate(&self, url: &Url);
}

/// Alert-style dialog.
pub trait Modal: Send + Sync {
    /// Open the dialog showing `html` wrapped in its default content frame.
    fn alert(&self, html: &str);
}

/// Client-local key/value storage.
pub trait LocalStorage: Send + Sync {
    /// Feature check; writes are skipped when this is false.
    fn is_available(&self) -> bool;

    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), PageError>;

    fn remove_item(&self, key: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ref_display() {
        let button = ElementRef::css(selectors::ADD_TO_CART_BUTTON);
        assert_eq!(
            button.next_sibling().to_string(),
            "[data-button-type=\"add-cart\"] + *"
        );
    }

    #[test]
    fn test_signal_and_hook_names() {
        assert_eq!(PageSignal::CompareReset.name(), "compareReset");
        assert_eq!(PageHook::SortBySubmitted.name(), "sortBy-submitted");
    }
}
