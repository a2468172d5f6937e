//! Value object describing the rendered category page.

use scraper::{Html, Selector};
use storefront_cart::{CartId, ProductId};

use crate::dom::selectors;
use crate::error::PageError;

/// The "add all to cart" control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddAllControl {
    /// Cart id rendered on the control; informational only.
    pub cart_id: Option<CartId>,
}

/// Everything the controller needs to know about the page, captured up front
/// so the cart flows run without a live document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Ids of every product element, in document order, duplicates included.
    pub product_ids: Vec<ProductId>,
    pub add_all: Option<AddAllControl>,
    /// Present only when the remove-all control carries a cart id.
    pub remove_all_cart_id: Option<CartId>,
    pub has_faceted_search: bool,
    pub has_no_products_notification: bool,
    pub has_shop_by_price: bool,
    pub has_active_price_filter: bool,
}

impl PageSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProductId>,
    {
        self.product_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_add_all(mut self, cart_id: Option<CartId>) -> Self {
        self.add_all = Some(AddAllControl { cart_id });
        self
    }

    pub fn with_remove_all(mut self, cart_id: impl Into<CartId>) -> Self {
        self.remove_all_cart_id = Some(cart_id.into());
        self
    }

    pub fn with_faceted_search(mut self) -> Self {
        self.has_faceted_search = true;
        self
    }

    pub fn with_no_products_notification(mut self) -> Self {
        self.has_no_products_notification = true;
        self
    }

    pub fn with_shop_by_price(mut self, price_filter_active: bool) -> Self {
        self.has_shop_by_price = true;
        self.has_active_price_filter = price_filter_active;
        self
    }

    /// Capture a snapshot from rendered page markup.
    pub fn from_html(html: &str) -> Result<Self, PageError> {
        let document = Html::parse_document(html);

        let add_all = first(&document, selectors::ADD_ALL_CART)?.map(|element| AddAllControl {
            cart_id: cart_id_attr(element.value()),
        });
        let remove_all_cart_id = first(&document, selectors::REMOVE_ALL_CART)?
            .and_then(|element| cart_id_attr(element.value()));

        Ok(Self {
            product_ids: product_ids(&document)?,
            add_all,
            remove_all_cart_id,
            has_faceted_search: exists(&document, selectors::FACETED_SEARCH)?,
            has_no_products_notification: exists(&document, selectors::NO_PRODUCTS_NOTIFICATION)?,
            has_shop_by_price: exists(&document, selectors::SHOP_BY_PRICE)?,
            has_active_price_filter: exists(&document, selectors::ACTIVE_PRICE_FILTER_LINK)?,
        })
    }

    /// Re-read product ids after the listing fragment was replaced.
    pub fn refresh_products(&mut self, listing_html: &str) -> Result<(), PageError> {
        let fragment = Html::parse_fragment(listing_html);
        self.product_ids = product_ids(&fragment)?;
        Ok(())
    }
}

fn selector(css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|e| PageError::Config(format!("invalid selector {css}: {e:?}")))
}

fn first<'a>(document: &'a Html, css: &str) -> Result<Option<scraper::ElementRef<'a>>, PageError> {
    Ok(document.select(&selector(css)?).next())
}

fn exists(document: &Html, css: &str) -> Result<bool, PageError> {
    Ok(first(document, css)?.is_some())
}

fn product_ids(document: &Html) -> Result<Vec<ProductId>, PageError> {
    Ok(document
        .select(&selector(selectors::PRODUCT_ID)?)
        .filter_map(|element| element.value().attr(selectors::PRODUCT_ID_ATTR))
        .map(ProductId::from)
        .collect())
}

fn cart_id_attr(element: &scraper::node::Element) -> Option<CartId> {
    element
        .attr(selectors::CART_ID_ATTR)
        .filter(|id| !id.trim().is_empty())
        .map(CartId::from)
}
