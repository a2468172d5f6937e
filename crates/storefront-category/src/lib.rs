//! Category listing page controller.
//!
//! Wires page events to the storefront cart API and keeps the page accessible:
//!
//! - **Bulk cart sync**: add every listed product to the session's cart, or
//!   delete the cart, then reconcile the badge and cached quantity
//! - **Faceted search**: mount the widget and swap in the fragments it renders
//! - **Live regions**: announce add-to-cart, price filter and reset changes
//! - **Catalog behavior**: sort-by focus restoration and sort submission
//!
//! The controller reads a [`PageSnapshot`] and writes through the [`PageDom`],
//! [`Modal`] and [`LocalStorage`] ports, so it runs without a live document.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_category::prelude::*;
//!
//! let api = Arc::new(StorefrontCartApi::new(fetch_client));
//! let controller = CategoryPageController::builder()
//!     .context(PageContext::from_json(&context_json)?)
//!     .dom(dom)
//!     .modal(modal)
//!     .storage(storage)
//!     .cart_clients(api.clone(), api)
//!     .build()?;
//!
//! controller.on_ready(PageSnapshot::from_html(&html)?)?;
//! controller.handle(PageEvent::AddAllClicked).await?;
//! ```

pub mod bulk;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod faceted;
pub mod live_region;
pub mod quantity_cache;
pub mod snapshot;
pub mod testing;
pub mod translations;

pub use bulk::{BulkCartCoordinator, BulkOutcome, CartPlan, RefreshOutcome};
pub use catalog::{sorted_url, CatalogBehavior, DefaultCatalog, SORT_BY_STATUS_KEY};
pub use config::{
    ConfirmationMessages, ControllerConfig, PageContext, RefreshStrategy,
    DEFAULT_PRODUCTS_PER_PAGE, RELOAD_DELAY,
};
pub use controller::{
    Bindings, CategoryPageController, CategoryPageControllerBuilder, EventOutcome, PageEvent,
};
pub use dom::{selectors, ElementRef, LocalStorage, Modal, PageDom, PageHook, PageSignal};
pub use error::PageError;
pub use faceted::{
    ContentUpdateHandler, FacetedContent, FacetedSearchBridge, FacetedSearchOptions,
    FacetedSearchWidget,
};
pub use live_region::{LiveRegionAnnouncer, LiveRole, Liveness};
pub use quantity_cache::{PersistedQuantityCache, CART_QUANTITY_KEY};
pub use snapshot::{AddAllControl, PageSnapshot};
pub use translations::{TranslationDictionary, ValidationMessageSet};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::bulk::{BulkCartCoordinator, BulkOutcome, RefreshOutcome};
    pub use crate::config::{ControllerConfig, PageContext, RefreshStrategy};
    pub use crate::controller::{CategoryPageController, EventOutcome, PageEvent};
    pub use crate::dom::{ElementRef, LocalStorage, Modal, PageDom};
    pub use crate::error::PageError;
    pub use crate::snapshot::PageSnapshot;
    pub use storefront_cart::prelude::*;
}
