//! Bulk "add all" and "remove all" cart flows.
//!
//! Add-all always reads the session's cart first and only then mutates it:
//! an existing cart gets the items appended, otherwise a new cart is created.
//! Failures are logged and reported to the caller; they never reload the page,
//! never show the success confirmation and leave the badge and cache alone.
//! No guard prevents two add-all flows from running at the same time.

use std::sync::Arc;
use std::time::Duration;

use storefront_cart::{
    bulk_line_items, CartApiError, CartId, CartIdentity, CartMutationClient, CartMutationResult,
    CartSnapshotClient, LineItem,
};

use crate::config::{ControllerConfig, RefreshStrategy};
use crate::dom::{Modal, PageDom};
use crate::quantity_cache::PersistedQuantityCache;
use crate::snapshot::PageSnapshot;

/// The single mutation an add-all invocation will issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartPlan {
    Create(Vec<LineItem>),
    Append(CartId, Vec<LineItem>),
}

impl CartPlan {
    /// Decide create versus append from the cart identity.
    pub fn for_identity(identity: CartIdentity, line_items: Vec<LineItem>) -> Self {
        match identity {
            CartIdentity::Some(id) => CartPlan::Append(id, line_items),
            CartIdentity::None => CartPlan::Create(line_items),
        }
    }

    pub fn line_items(&self) -> &[LineItem] {
        match self {
            CartPlan::Create(items) | CartPlan::Append(_, items) => items,
        }
    }
}

/// How the page was brought back in line with the server after success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    ReloadScheduled(Duration),
    ServerTruthApplied { quantity: u64 },
}

/// Terminal state of one bulk action.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    Completed { refresh: RefreshOutcome },
    Failed(CartApiError),
}

impl BulkOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, BulkOutcome::Completed { .. })
    }
}

/// Runs the bulk cart flows against the cart API and reconciles the page.
#[derive(Clone)]
pub struct BulkCartCoordinator {
    snapshots: Arc<dyn CartSnapshotClient>,
    mutations: Arc<dyn CartMutationClient>,
    dom: Arc<dyn PageDom>,
    modal: Arc<dyn Modal>,
    cache: PersistedQuantityCache,
    config: ControllerConfig,
}

impl BulkCartCoordinator {
    pub fn new(
        snapshots: Arc<dyn CartSnapshotClient>,
        mutations: Arc<dyn CartMutationClient>,
        dom: Arc<dyn PageDom>,
        modal: Arc<dyn Modal>,
        cache: PersistedQuantityCache,
    ) -> Self {
        Self {
            snapshots,
            mutations,
            dom,
            modal,
            cache,
            config: ControllerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.cache = self.cache.with_key(config.quantity_cache_key.clone());
        self.config = config;
        self
    }

    /// Add one unit of every product on the page to the session's cart.
    pub async fn add_all(&self, page: &PageSnapshot) -> BulkOutcome {
        let line_items = bulk_line_items(&page.product_ids);
        let context_cart = page.add_all.as_ref().and_then(|control| control.cart_id.as_ref());
        tracing::info!(
            items = line_items.len(),
            context_cart = ?context_cart.map(CartId::as_str),
            "adding all listed products to cart"
        );

        match self.add_line_items(line_items).await {
            Ok(result) => {
                tracing::info!(
                    status = result.status,
                    cart_id = ?result.cart_id,
                    "bulk add succeeded"
                );
                self.modal.alert(&self.config.messages.items_added);
                BulkOutcome::Completed {
                    refresh: self.refresh().await,
                }
            }
            Err(error) => self.fail("add all to cart", error),
        }
    }

    /// Delete the cart named by the remove-all control.
    pub async fn remove_all(&self, cart_id: &CartId) -> BulkOutcome {
        tracing::info!(cart_id = %cart_id, "clearing cart");

        if let Err(error) = self.mutations.delete_cart(cart_id).await {
            return self.fail("clear cart", error);
        }

        self.modal.alert(&self.config.messages.cart_cleared);
        if let Err(error) = self.cache.clear(self.dom.as_ref()) {
            tracing::warn!(error = %error, "could not reset cached cart quantity");
        }
        BulkOutcome::Completed {
            refresh: self.refresh().await,
        }
    }

    async fn add_line_items(
        &self,
        line_items: Vec<LineItem>,
    ) -> Result<CartMutationResult, CartApiError> {
        let identity = self.snapshots.fetch_current_cart().await?;
        let plan = CartPlan::for_identity(identity, line_items);
        tracing::debug!(items = plan.line_items().len(), "cart plan ready");
        match plan {
            CartPlan::Append(cart_id, items) => {
                tracing::debug!(cart_id = %cart_id, "appending to existing cart");
                self.mutations.append_line_items(&cart_id, &items).await
            }
            CartPlan::Create(items) => {
                tracing::debug!("no cart yet, creating one");
                self.mutations.create_cart(&items).await
            }
        }
    }

    async fn refresh(&self) -> RefreshOutcome {
        match self.config.refresh {
            RefreshStrategy::Reload { delay_ms } => {
                self.schedule_reload(Duration::from_millis(delay_ms))
            }
            RefreshStrategy::ApplyServerTruth => match self.snapshots.fetch_snapshot().await {
                Ok(snapshot) => {
                    let quantity = snapshot.quantity();
                    if let Err(error) = self.cache.apply(self.dom.as_ref(), quantity) {
                        tracing::warn!(error = %error, "could not cache cart quantity");
                    }
                    RefreshOutcome::ServerTruthApplied { quantity }
                }
                Err(error) => {
                    tracing::warn!(
                        error = %error,
                        "could not re-read cart, falling back to reload"
                    );
                    self.schedule_reload(crate::config::RELOAD_DELAY)
                }
            },
        }
    }

    fn schedule_reload(&self, delay: Duration) -> RefreshOutcome {
        self.dom.schedule_reload(delay);
        RefreshOutcome::ReloadScheduled(delay)
    }

    fn fail(&self, action: &str, error: CartApiError) -> BulkOutcome {
        tracing::error!(
            action,
            error = %error,
            network = error.is_network(),
            "bulk cart action failed"
        );
        if self.config.surface_failures {
            self.modal.alert(&self.config.messages.action_failed);
        }
        BulkOutcome::Failed(error)
    }
}
