//! The category page controller.
//!
//! [`CategoryPageController::on_ready`] runs once the page is rendered and
//! decides which handlers are bound. Afterwards the host forwards user
//! interactions as [`PageEvent`]s; events for unbound handlers are ignored.

use std::sync::{Arc, Mutex, MutexGuard};

use storefront_cart::{CartId, CartMutationClient, CartSnapshotClient};
use url::Url;

use crate::bulk::{BulkCartCoordinator, BulkOutcome};
use crate::catalog::{CatalogBehavior, DefaultCatalog};
use crate::config::{ControllerConfig, PageContext};
use crate::dom::{selectors, ElementRef, LocalStorage, Modal, PageDom, PageHook};
use crate::error::PageError;
use crate::faceted::{
    ContentUpdateHandler, FacetedContent, FacetedSearchBridge, FacetedSearchWidget,
};
use crate::live_region::{LiveRegionAnnouncer, LiveRole, Liveness};
use crate::quantity_cache::PersistedQuantityCache;
use crate::snapshot::PageSnapshot;
use crate::translations::{TranslationDictionary, ValidationMessageSet};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A user interaction forwarded by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// An add-to-cart button was clicked.
    AddToCartClicked { button: ElementRef },
    /// A shop-by-price link was clicked.
    PriceFilterClicked,
    /// The filter reset button was clicked.
    ResetClicked,
    AddAllClicked,
    RemoveAllClicked,
    /// The sort form was submitted on a page without faceted search.
    SortBySubmitted {
        current_url: Url,
        field: String,
        value: String,
    },
    /// The faceted-search widget produced new fragments.
    FacetedContentLoaded(FacetedContent),
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// No handler is bound for the event on this page.
    Ignored,
    /// A live region was configured.
    Announced(ElementRef),
    Bulk(BulkOutcome),
    Navigated(Url),
    ContentReplaced,
}

/// Handlers bound by [`CategoryPageController::on_ready`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    pub add_all: bool,
    /// Cart the remove-all control deletes; unbound without one.
    pub remove_all: Option<CartId>,
    pub price_filter: bool,
    /// Sort submissions are handled here rather than by faceted search.
    pub sort_by_hook: bool,
    pub faceted_search: bool,
}

/// Controller for the category listing page.
pub struct CategoryPageController {
    context: PageContext,
    dom: Arc<dyn PageDom>,
    storage: Arc<dyn LocalStorage>,
    catalog: Arc<dyn CatalogBehavior>,
    widget: Option<Arc<dyn FacetedSearchWidget>>,
    coordinator: BulkCartCoordinator,
    announcer: LiveRegionAnnouncer,
    page: Arc<Mutex<PageSnapshot>>,
    bindings: Mutex<Option<Bindings>>,
    bridge: Mutex<Option<FacetedSearchBridge>>,
}

impl CategoryPageController {
    pub fn builder() -> CategoryPageControllerBuilder {
        CategoryPageControllerBuilder::default()
    }

    /// Run the page-ready sequence against `snapshot` and bind handlers.
    /// Calling it again rebinds against the new snapshot.
    pub fn on_ready(&self, snapshot: PageSnapshot) -> Result<Bindings, PageError> {
        let dom = self.dom.as_ref();

        self.catalog.arrange_focus_on_sort_by(dom, self.storage.as_ref());

        if snapshot.has_shop_by_price && snapshot.has_active_price_filter {
            dom.focus(&ElementRef::css(selectors::ACTIVE_PRICE_FILTER_LINK));
        }

        self.catalog.init_compare_products(&self.context);

        let bridge = match &self.widget {
            Some(widget) if snapshot.has_faceted_search => FacetedSearchBridge::init(
                &snapshot,
                &self.context,
                self.validation_messages(),
                widget.as_ref(),
                ContentUpdateHandler::new(self.dom.clone(), self.page.clone()),
            ),
            None if snapshot.has_faceted_search => {
                tracing::warn!("page renders faceted search but no widget is configured");
                None
            }
            _ => None,
        };
        let faceted_search = bridge.is_some();
        if !faceted_search {
            dom.subscribe(PageHook::SortBySubmitted);
        }

        if snapshot.has_no_products_notification {
            dom.focus(&ElementRef::css(selectors::NO_PRODUCTS_NOTIFICATION));
        }

        let bindings = Bindings {
            add_all: snapshot.add_all.is_some(),
            remove_all: snapshot.remove_all_cart_id.clone(),
            price_filter: snapshot.has_shop_by_price,
            sort_by_hook: !faceted_search,
            faceted_search,
        };
        tracing::debug!(
            products = snapshot.product_ids.len(),
            add_all = bindings.add_all,
            remove_all = bindings.remove_all.is_some(),
            faceted_search,
            "category page ready"
        );

        *lock(&self.page) = snapshot;
        *lock(&self.bridge) = bridge;
        *lock(&self.bindings) = Some(bindings.clone());
        Ok(bindings)
    }

    /// Handlers bound by the last `on_ready`, if it ran.
    pub fn bindings(&self) -> Option<Bindings> {
        lock(&self.bindings).clone()
    }

    /// Current page snapshot, including products from replaced listings.
    pub fn snapshot(&self) -> PageSnapshot {
        lock(&self.page).clone()
    }

    /// Dispatch one page event.
    pub async fn handle(&self, event: PageEvent) -> Result<EventOutcome, PageError> {
        let Some(bindings) = self.bindings() else {
            tracing::debug!(?event, "event before page ready, ignoring");
            return Ok(EventOutcome::Ignored);
        };

        match event {
            PageEvent::AddToCartClicked { button } => Ok(self.announce(
                button.next_sibling(),
                LiveRole::Status,
                Liveness::Polite,
            )),
            PageEvent::PriceFilterClicked if bindings.price_filter => Ok(self.announce(
                ElementRef::css(selectors::PRICE_FILTER_MESSAGE),
                LiveRole::Status,
                Liveness::Assertive,
            )),
            PageEvent::ResetClicked => Ok(self.announce(
                ElementRef::css(selectors::RESET_MESSAGE),
                LiveRole::Status,
                Liveness::Polite,
            )),
            PageEvent::AddAllClicked if bindings.add_all => {
                let page = self.snapshot();
                Ok(EventOutcome::Bulk(self.coordinator.add_all(&page).await))
            }
            PageEvent::RemoveAllClicked => match bindings.remove_all {
                Some(cart_id) => {
                    Ok(EventOutcome::Bulk(self.coordinator.remove_all(&cart_id).await))
                }
                None => Ok(EventOutcome::Ignored),
            },
            PageEvent::SortBySubmitted {
                current_url,
                field,
                value,
            } if bindings.sort_by_hook => {
                let target = self.catalog.on_sort_by_submit(
                    self.dom.as_ref(),
                    self.storage.as_ref(),
                    &current_url,
                    &field,
                    &value,
                )?;
                Ok(EventOutcome::Navigated(target))
            }
            PageEvent::FacetedContentLoaded(content) => {
                let handler = lock(&self.bridge).as_ref().map(|bridge| bridge.handler().clone());
                match handler {
                    Some(handler) => {
                        handler.handle(&content);
                        Ok(EventOutcome::ContentReplaced)
                    }
                    None => Ok(EventOutcome::Ignored),
                }
            }
            _ => Ok(EventOutcome::Ignored),
        }
    }

    /// Price validation messages for the widget. A dictionary that does not
    /// parse yields empty messages, like a missing one.
    fn validation_messages(&self) -> ValidationMessageSet {
        match TranslationDictionary::from_context(&self.context) {
            Ok(dictionary) => ValidationMessageSet::from_dictionary(&dictionary),
            Err(error) => {
                tracing::warn!(error = %error, "validation dictionary is malformed");
                ValidationMessageSet::default()
            }
        }
    }

    fn announce(&self, target: ElementRef, role: LiveRole, liveness: Liveness) -> EventOutcome {
        self.announcer.announce(self.dom.as_ref(), &target, role, liveness);
        EventOutcome::Announced(target)
    }
}

/// Builder for [`CategoryPageController`].
#[derive(Default)]
pub struct CategoryPageControllerBuilder {
    context: PageContext,
    config: ControllerConfig,
    dom: Option<Arc<dyn PageDom>>,
    modal: Option<Arc<dyn Modal>>,
    storage: Option<Arc<dyn LocalStorage>>,
    snapshots: Option<Arc<dyn CartSnapshotClient>>,
    mutations: Option<Arc<dyn CartMutationClient>>,
    catalog: Option<Arc<dyn CatalogBehavior>>,
    widget: Option<Arc<dyn FacetedSearchWidget>>,
}

impl CategoryPageControllerBuilder {
    pub fn context(mut self, context: PageContext) -> Self {
        self.context = context;
        self
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dom(mut self, dom: Arc<dyn PageDom>) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn modal(mut self, modal: Arc<dyn Modal>) -> Self {
        self.modal = Some(modal);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Cart reads and writes, usually both served by one `StorefrontCartApi`.
    pub fn cart_clients(
        mut self,
        snapshots: Arc<dyn CartSnapshotClient>,
        mutations: Arc<dyn CartMutationClient>,
    ) -> Self {
        self.snapshots = Some(snapshots);
        self.mutations = Some(mutations);
        self
    }

    /// Override the catalog behavior; defaults to [`DefaultCatalog`].
    pub fn catalog(mut self, catalog: Arc<dyn CatalogBehavior>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Widget mounted when the page renders faceted search.
    pub fn faceted_search(mut self, widget: Arc<dyn FacetedSearchWidget>) -> Self {
        self.widget = Some(widget);
        self
    }

    pub fn build(self) -> Result<CategoryPageController, PageError> {
        let dom = self.dom.ok_or_else(|| missing("dom"))?;
        let modal = self.modal.ok_or_else(|| missing("modal"))?;
        let storage = self.storage.ok_or_else(|| missing("storage"))?;
        let snapshots = self.snapshots.ok_or_else(|| missing("cart snapshot client"))?;
        let mutations = self.mutations.ok_or_else(|| missing("cart mutation client"))?;

        let coordinator = BulkCartCoordinator::new(
            snapshots,
            mutations,
            dom.clone(),
            modal,
            PersistedQuantityCache::new(storage.clone()),
        )
        .with_config(self.config);

        Ok(CategoryPageController {
            context: self.context,
            dom,
            storage,
            catalog: self.catalog.unwrap_or_else(|| Arc::new(DefaultCatalog)),
            widget: self.widget,
            coordinator,
            announcer: LiveRegionAnnouncer,
            page: Arc::new(Mutex::new(PageSnapshot::default())),
            bindings: Mutex::new(None),
            bridge: Mutex::new(None),
        })
    }
}

fn missing(port: &str) -> PageError {
    PageError::Config(format!("category page controller needs a {port}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SORT_BY_STATUS_KEY;
    use crate::faceted::FacetedSearchOptions;
    use crate::testing::{CartCall, MemoryStorage, RecordingDom, RecordingModal, ScriptedCartApi};

    struct NoopWidget;

    impl FacetedSearchWidget for NoopWidget {
        fn mount(&self, _options: &FacetedSearchOptions, _on_update: ContentUpdateHandler) {}
    }

    #[derive(Default)]
    struct RecordingWidget {
        mounts: Mutex<Vec<FacetedSearchOptions>>,
    }

    impl FacetedSearchWidget for RecordingWidget {
        fn mount(&self, options: &FacetedSearchOptions, _on_update: ContentUpdateHandler) {
            self.mounts.lock().unwrap().push(options.clone());
        }
    }

    #[derive(Default)]
    struct CountingCatalog {
        compare_inits: Mutex<usize>,
    }

    impl CatalogBehavior for CountingCatalog {
        fn init_compare_products(&self, _context: &PageContext) {
            *self.compare_inits.lock().unwrap() += 1;
        }
    }

    struct Fixture {
        dom: Arc<RecordingDom>,
        storage: Arc<MemoryStorage>,
        api: Arc<ScriptedCartApi>,
        controller: CategoryPageController,
    }

    fn fixture(widget: Option<Arc<dyn FacetedSearchWidget>>) -> Fixture {
        let dom = Arc::new(RecordingDom::default());
        let storage = Arc::new(MemoryStorage::default());
        let api = Arc::new(ScriptedCartApi::default());
        let mut builder = CategoryPageController::builder()
            .dom(dom.clone())
            .modal(Arc::new(RecordingModal::default()))
            .storage(storage.clone())
            .cart_clients(api.clone(), api.clone());
        if let Some(widget) = widget {
            builder = builder.faceted_search(widget);
        }
        Fixture {
            dom,
            storage,
            api,
            controller: builder.build().unwrap(),
        }
    }

    #[test]
    fn test_build_requires_ports() {
        let result = CategoryPageController::builder()
            .dom(Arc::new(RecordingDom::default()))
            .build();
        assert!(matches!(result, Err(PageError::Config(_))));
    }

    #[test]
    fn test_ready_runs_accessibility_steps() {
        let f = fixture(None);
        f.storage.set_item(SORT_BY_STATUS_KEY, "selected").unwrap();

        let bindings = f
            .controller
            .on_ready(
                PageSnapshot::new()
                    .with_shop_by_price(true)
                    .with_no_products_notification(),
            )
            .unwrap();

        assert_eq!(
            f.dom.focused(),
            vec![
                ElementRef::css(selectors::SORT_BY_SELECT),
                ElementRef::css(selectors::ACTIVE_PRICE_FILTER_LINK),
                ElementRef::css(selectors::NO_PRODUCTS_NOTIFICATION),
            ]
        );
        assert_eq!(f.dom.hooks(), vec![PageHook::SortBySubmitted]);
        assert!(bindings.price_filter && bindings.sort_by_hook);
        assert!(!bindings.add_all && bindings.remove_all.is_none());
    }

    #[test]
    fn test_ready_calls_compare_hook() {
        let catalog = Arc::new(CountingCatalog::default());
        let api = Arc::new(ScriptedCartApi::default());
        let controller = CategoryPageController::builder()
            .dom(Arc::new(RecordingDom::default()))
            .modal(Arc::new(RecordingModal::default()))
            .storage(Arc::new(MemoryStorage::default()))
            .cart_clients(api.clone(), api)
            .catalog(catalog.clone())
            .build()
            .unwrap();

        controller.on_ready(PageSnapshot::new()).unwrap();

        assert_eq!(*catalog.compare_inits.lock().unwrap(), 1);
    }

    #[test]
    fn test_faceted_pages_skip_sort_hook() {
        let f = fixture(Some(Arc::new(NoopWidget)));

        let bindings = f
            .controller
            .on_ready(PageSnapshot::new().with_faceted_search())
            .unwrap();

        assert!(bindings.faceted_search);
        assert!(!bindings.sort_by_hook);
        assert!(f.dom.hooks().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_dictionary_does_not_block_bindings() {
        let dom = Arc::new(RecordingDom::default());
        let api = Arc::new(ScriptedCartApi::default());
        let controller = CategoryPageController::builder()
            .context(PageContext {
                validation_dictionary_json: Some("{not json".to_string()),
                ..PageContext::default()
            })
            .dom(dom.clone())
            .modal(Arc::new(RecordingModal::default()))
            .storage(Arc::new(MemoryStorage::default()))
            .cart_clients(api.clone(), api.clone())
            .faceted_search(Arc::new(NoopWidget))
            .build()
            .unwrap();

        let bindings = controller
            .on_ready(
                PageSnapshot::new()
                    .with_products(["1"])
                    .with_add_all(None)
                    .with_remove_all("cart-3"),
            )
            .unwrap();

        assert!(bindings.add_all);
        assert_eq!(bindings.remove_all, Some(CartId::new("cart-3")));
        assert!(bindings.sort_by_hook);
        let outcome = controller.handle(PageEvent::AddAllClicked).await.unwrap();
        assert!(matches!(outcome, EventOutcome::Bulk(BulkOutcome::Completed { .. })));
        assert!(api.calls().contains(&CartCall::Create(vec![
            storefront_cart::LineItem::single(storefront_cart::ProductId::new("1"))
        ])));
    }

    #[test]
    fn test_malformed_dictionary_mounts_widget_with_empty_messages() {
        let widget = Arc::new(RecordingWidget::default());
        let api = Arc::new(ScriptedCartApi::default());
        let controller = CategoryPageController::builder()
            .context(PageContext {
                validation_dictionary_json: Some("{not json".to_string()),
                ..PageContext::default()
            })
            .dom(Arc::new(RecordingDom::default()))
            .modal(Arc::new(RecordingModal::default()))
            .storage(Arc::new(MemoryStorage::default()))
            .cart_clients(api.clone(), api)
            .faceted_search(widget.clone())
            .build()
            .unwrap();

        let bindings = controller
            .on_ready(PageSnapshot::new().with_faceted_search())
            .unwrap();

        assert!(bindings.faceted_search);
        let mounts = widget.mounts.lock().unwrap();
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].validation_error_messages, ValidationMessageSet::default());
    }

    #[test]
    fn test_faceted_page_without_widget_falls_back_to_sort_hook() {
        let f = fixture(None);

        let bindings = f
            .controller
            .on_ready(PageSnapshot::new().with_faceted_search())
            .unwrap();

        assert!(!bindings.faceted_search);
        assert!(bindings.sort_by_hook);
        assert_eq!(f.dom.hooks(), vec![PageHook::SortBySubmitted]);
    }

    #[tokio::test]
    async fn test_events_before_ready_are_ignored() {
        let f = fixture(None);
        let outcome = f.controller.handle(PageEvent::AddAllClicked).await.unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(f.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_click_announces_next_sibling() {
        let f = fixture(None);
        f.controller.on_ready(PageSnapshot::new()).unwrap();
        let button = ElementRef::css(selectors::ADD_TO_CART_BUTTON);

        let outcome = f
            .controller
            .handle(PageEvent::AddToCartClicked {
                button: button.clone(),
            })
            .await
            .unwrap();

        let sibling = button.next_sibling();
        assert_eq!(outcome, EventOutcome::Announced(sibling.clone()));
        assert_eq!(f.dom.attribute(&sibling, "role").as_deref(), Some("status"));
        assert_eq!(f.dom.attribute(&sibling, "aria-live").as_deref(), Some("polite"));
    }

    #[tokio::test]
    async fn test_price_filter_click_needs_shop_by_price() {
        let f = fixture(None);
        f.controller.on_ready(PageSnapshot::new()).unwrap();
        let message = ElementRef::css(selectors::PRICE_FILTER_MESSAGE);

        let outcome = f.controller.handle(PageEvent::PriceFilterClicked).await.unwrap();
        assert_eq!(outcome, EventOutcome::Ignored);

        f.controller
            .on_ready(PageSnapshot::new().with_shop_by_price(false))
            .unwrap();
        f.controller.handle(PageEvent::PriceFilterClicked).await.unwrap();
        assert_eq!(f.dom.attribute(&message, "aria-live").as_deref(), Some("assertive"));
    }

    #[tokio::test]
    async fn test_reset_click_announces_politely() {
        let f = fixture(None);
        f.controller.on_ready(PageSnapshot::new()).unwrap();

        f.controller.handle(PageEvent::ResetClicked).await.unwrap();

        let message = ElementRef::css(selectors::RESET_MESSAGE);
        assert_eq!(f.dom.attribute(&message, "role").as_deref(), Some("status"));
        assert_eq!(f.dom.attribute(&message, "aria-live").as_deref(), Some("polite"));
    }

    #[tokio::test]
    async fn test_add_all_unbound_without_control() {
        let f = fixture(None);
        f.controller
            .on_ready(PageSnapshot::new().with_products(["1", "2"]))
            .unwrap();

        let outcome = f.controller.handle(PageEvent::AddAllClicked).await.unwrap();

        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(f.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sort_submission_navigates() {
        let f = fixture(None);
        f.controller.on_ready(PageSnapshot::new()).unwrap();

        let outcome = f
            .controller
            .handle(PageEvent::SortBySubmitted {
                current_url: Url::parse("https://shop.test/bags/?page=2").unwrap(),
                field: "sort".to_string(),
                value: "bestselling".to_string(),
            })
            .await
            .unwrap();

        let expected = Url::parse("https://shop.test/bags/?sort=bestselling").unwrap();
        assert_eq!(outcome, EventOutcome::Navigated(expected.clone()));
        assert_eq!(f.dom.navigations(), vec![expected]);
    }

    #[tokio::test]
    async fn test_faceted_content_updates_products_for_add_all() {
        let f = fixture(Some(Arc::new(NoopWidget)));
        f.controller
            .on_ready(
                PageSnapshot::new()
                    .with_faceted_search()
                    .with_add_all(None)
                    .with_products(["1"]),
            )
            .unwrap();

        let outcome = f
            .controller
            .handle(PageEvent::FacetedContentLoaded(FacetedContent {
                product_listing: r#"<li data-product-id="4"></li><li data-product-id="5"></li>"#
                    .to_string(),
                sidebar: String::new(),
            }))
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::ContentReplaced);

        f.controller.handle(PageEvent::AddAllClicked).await.unwrap();

        let created: Vec<String> = f
            .api
            .calls()
            .into_iter()
            .find_map(|call| match call {
                CartCall::Create(items) => Some(
                    items
                        .iter()
                        .map(|item| item.product_id.as_str().to_string())
                        .collect(),
                ),
                _ => None,
            })
            .unwrap();
        assert_eq!(created, vec!["4", "5"]);
    }
}
