//! Bridge between the page and the faceted-search widget.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PageContext;
use crate::dom::{selectors, ElementRef, PageDom, PageSignal};
use crate::snapshot::PageSnapshot;
use crate::translations::ValidationMessageSet;

/// Duration of the scroll back to the top after new content lands.
pub const SCROLL_TO_TOP: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductsConfig {
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryConfig {
    pub shop_by_price: bool,
    pub products: ProductsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchConfig {
    pub category: CategoryConfig,
}

/// Templates the widget renders fragments with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub product_listing: String,
    pub sidebar: String,
}

/// Request options handed to the faceted-search widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetedSearchOptions {
    pub config: SearchConfig,
    pub template: TemplateConfig,
    pub show_more: String,
    /// Price filter messages, serialized as `validationErrorMessages`.
    pub validation_error_messages: ValidationMessageSet,
}

impl FacetedSearchOptions {
    pub fn for_category(products_per_page: u32, messages: ValidationMessageSet) -> Self {
        Self {
            config: SearchConfig {
                category: CategoryConfig {
                    shop_by_price: true,
                    products: ProductsConfig {
                        limit: products_per_page,
                    },
                },
            },
            template: TemplateConfig {
                product_listing: "category/product-listing".to_string(),
                sidebar: "category/sidebar".to_string(),
            },
            show_more: "category/show-more".to_string(),
            validation_error_messages: messages,
        }
    }
}

/// Freshly rendered fragments produced by a facet change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetedContent {
    pub product_listing: String,
    pub sidebar: String,
}

/// Applies new faceted content to the page. Never fails.
#[derive(Clone)]
pub struct ContentUpdateHandler {
    dom: Arc<dyn PageDom>,
    page: Arc<Mutex<PageSnapshot>>,
}

impl ContentUpdateHandler {
    pub fn new(dom: Arc<dyn PageDom>, page: Arc<Mutex<PageSnapshot>>) -> Self {
        Self { dom, page }
    }

    /// Swap listing and sidebar, reset compare state and scroll to the top.
    pub fn handle(&self, content: &FacetedContent) {
        self.dom.replace_html(
            &ElementRef::css(selectors::PRODUCT_LISTING_CONTAINER),
            &content.product_listing,
        );
        self.dom.replace_html(
            &ElementRef::css(selectors::FACETED_SEARCH_CONTAINER),
            &content.sidebar,
        );
        self.dom.emit(PageSignal::CompareReset);
        self.dom.scroll_to_top(SCROLL_TO_TOP);

        let mut page = self
            .page
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(error) = page.refresh_products(&content.product_listing) {
            tracing::warn!(error = %error, "could not re-read products from new listing");
        }
    }
}

/// The faceted-search widget itself, owned by the host.
pub trait FacetedSearchWidget: Send + Sync {
    /// Start the widget; it calls `on_update` whenever facets change.
    fn mount(&self, options: &FacetedSearchOptions, on_update: ContentUpdateHandler);
}

/// Present only on pages that render a faceted-search container.
pub struct FacetedSearchBridge {
    options: FacetedSearchOptions,
    handler: ContentUpdateHandler,
}

impl FacetedSearchBridge {
    /// Mount the widget when the page has faceted search, otherwise `None`.
    pub fn init(
        snapshot: &PageSnapshot,
        context: &PageContext,
        messages: ValidationMessageSet,
        widget: &dyn FacetedSearchWidget,
        handler: ContentUpdateHandler,
    ) -> Option<Self> {
        if !snapshot.has_faceted_search {
            return None;
        }

        let options =
            FacetedSearchOptions::for_category(context.category_products_per_page, messages);
        widget.mount(&options, handler.clone());
        tracing::debug!(limit = context.category_products_per_page, "faceted search mounted");

        Some(Self { options, handler })
    }

    pub fn options(&self) -> &FacetedSearchOptions {
        &self.options
    }

    pub fn handler(&self) -> &ContentUpdateHandler {
        &self.handler
    }
}
