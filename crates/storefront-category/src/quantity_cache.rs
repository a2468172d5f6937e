//! Last-known cart quantity, persisted client-side and mirrored to the badge.

use std::sync::Arc;

use crate::dom::{selectors, ElementRef, LocalStorage, PageDom, COUNT_PILL_CLASS};
use crate::error::PageError;

/// Storage key holding the quantity as an integer string.
pub const CART_QUANTITY_KEY: &str = "cart-quantity";

/// Quantity cache backed by [`LocalStorage`]. Every write is skipped when the
/// storage availability check fails; badge updates happen regardless.
#[derive(Clone)]
pub struct PersistedQuantityCache {
    storage: Arc<dyn LocalStorage>,
    key: String,
    badge: ElementRef,
}

impl std::fmt::Debug for PersistedQuantityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedQuantityCache")
            .field("key", &self.key)
            .field("badge", &self.badge)
            .finish_non_exhaustive()
    }
}

impl PersistedQuantityCache {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            key: CART_QUANTITY_KEY.to_string(),
            badge: ElementRef::css(selectors::CART_QUANTITY_BADGE),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Cached quantity; `None` when unavailable, missing or not a number.
    pub fn read(&self) -> Option<u64> {
        if !self.storage.is_available() {
            return None;
        }
        self.storage.get_item(&self.key)?.trim().parse().ok()
    }

    /// Persist `quantity`. Returns whether the write happened.
    pub fn store(&self, quantity: u64) -> Result<bool, PageError> {
        if !self.storage.is_available() {
            tracing::debug!(key = %self.key, "storage unavailable, skipping quantity write");
            return Ok(false);
        }
        self.storage.set_item(&self.key, &quantity.to_string())?;
        Ok(true)
    }

    /// Empty the badge, toggle its pill styling and zero the cache.
    pub fn clear(&self, dom: &dyn PageDom) -> Result<bool, PageError> {
        dom.set_text(&self.badge, "");
        dom.toggle_class(&self.badge, COUNT_PILL_CLASS);
        self.store(0)
    }

    /// Show `quantity` on the badge and persist it.
    pub fn apply(&self, dom: &dyn PageDom, quantity: u64) -> Result<bool, PageError> {
        let text = if quantity == 0 { String::new() } else { quantity.to_string() };
        dom.set_text(&self.badge, &text);
        self.store(quantity)
    }
}
