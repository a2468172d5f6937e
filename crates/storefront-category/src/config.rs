//! Page context and controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::quantity_cache::CART_QUANTITY_KEY;

/// Delay between a successful bulk action and the page reload.
pub const RELOAD_DELAY: Duration = Duration::from_millis(3000);

/// Products per listing page when the context does not say.
pub const DEFAULT_PRODUCTS_PER_PAGE: u32 = 12;

fn default_products_per_page() -> u32 {
    DEFAULT_PRODUCTS_PER_PAGE
}

/// Context object rendered into the category page by the theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    #[serde(default = "default_products_per_page")]
    pub category_products_per_page: u32,
    /// Active-locale validation dictionary, as a JSON string.
    #[serde(default, rename = "validationDictionaryJSON")]
    pub validation_dictionary_json: Option<String>,
    #[serde(default, rename = "validationFallbackDictionaryJSON")]
    pub validation_fallback_dictionary_json: Option<String>,
    #[serde(default, rename = "validationDefaultDictionaryJSON")]
    pub validation_default_dictionary_json: Option<String>,
}

impl Default for PageContext {
    fn default() -> Self {
        Self {
            category_products_per_page: DEFAULT_PRODUCTS_PER_PAGE,
            validation_dictionary_json: None,
            validation_fallback_dictionary_json: None,
            validation_default_dictionary_json: None,
        }
    }
}

impl PageContext {
    pub fn from_json(json: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What to do once a bulk cart action succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RefreshStrategy {
    /// Reload the page after a fixed delay.
    Reload { delay_ms: u64 },
    /// Re-read the cart and update the badge and cache in place.
    ApplyServerTruth,
}

impl RefreshStrategy {
    pub fn reload_after(delay: Duration) -> Self {
        RefreshStrategy::Reload {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Default for RefreshStrategy {
    fn default() -> Self {
        Self::reload_after(RELOAD_DELAY)
    }
}

/// Messages shown in the confirmation modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationMessages {
    pub items_added: String,
    pub cart_cleared: String,
    pub action_failed: String,
}

impl Default for ConfirmationMessages {
    fn default() -> Self {
        Self {
            items_added: concat!(
                "<h3>All available items added to cart</h3> ",
                "<p>This message will close shortly.</p>"
            )
            .to_string(),
            cart_cleared: "<h3>Cart Cleared.</h3>".to_string(),
            action_failed: "<h3>Your cart could not be updated.</h3> <p>Please try again.</p>"
                .to_string(),
        }
    }
}

/// Behavior switches for the category page controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub refresh: RefreshStrategy,
    /// Open a failure modal when a bulk action fails, instead of only logging.
    pub surface_failures: bool,
    pub quantity_cache_key: String,
    pub messages: ConfirmationMessages,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            refresh: RefreshStrategy::default(),
            surface_failures: false,
            quantity_cache_key: CART_QUANTITY_KEY.to_string(),
            messages: ConfirmationMessages::default(),
        }
    }
}

impl ControllerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, PageError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_refresh(mut self, refresh: RefreshStrategy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_surface_failures(mut self, enabled: bool) -> Self {
        self.surface_failures = enabled;
        self
    }

    pub fn with_quantity_cache_key(mut self, key: impl Into<String>) -> Self {
        self.quantity_cache_key = key.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_refresh_is_three_second_reload() {
        assert_eq!(
            ControllerConfig::default().refresh,
            RefreshStrategy::Reload { delay_ms: 3000 }
        );
    }

    #[test]
    fn test_controller_config_from_partial_json() {
        let config = ControllerConfig::from_json(
            r#"{"refresh": {"strategy": "apply_server_truth"}, "surface_failures": true}"#,
        )
        .unwrap();

        assert_eq!(config.refresh, RefreshStrategy::ApplyServerTruth);
        assert!(config.surface_failures);
        assert_eq!(config.quantity_cache_key, "cart-quantity");
        assert_eq!(config.messages.cart_cleared, "<h3>Cart Cleared.</h3>");
    }

    #[test]
    fn test_page_context_from_theme_json() {
        let context = PageContext::from_json(
            r#"{"categoryProductsPerPage": 24, "validationDictionaryJSON": "{}"}"#,
        )
        .unwrap();
        assert_eq!(context.category_products_per_page, 24);
        assert_eq!(context.validation_dictionary_json.as_deref(), Some("{}"));
        assert_eq!(context.validation_default_dictionary_json, None);
    }

    #[test]
    fn test_page_context_rejects_malformed_json() {
        assert!(matches!(
            PageContext::from_json("{"),
            Err(PageError::Config(_))
        ));
    }
}
