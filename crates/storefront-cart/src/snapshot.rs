//! Read model of the shopper's current cart.

use crate::ids::{CartId, ProductId};
use serde::{Deserialize, Serialize};

/// Which cart, if any, the session currently owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartIdentity {
    /// No cart yet; the next bulk add must create one.
    None,
    /// An active cart; the next bulk add appends to it.
    Some(CartId),
}

impl CartIdentity {
    pub fn is_none(&self) -> bool {
        matches!(self, CartIdentity::None)
    }
}

impl From<Option<CartId>> for CartIdentity {
    fn from(id: Option<CartId>) -> Self {
        id.map_or(CartIdentity::None, CartIdentity::Some)
    }
}

/// Summary of one line item as reported by the cart endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItemSummary {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub quantity: u32,
}

/// Line items grouped the way the storefront API groups them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItems {
    #[serde(default)]
    pub physical_items: Vec<CartLineItemSummary>,
    #[serde(default)]
    pub digital_items: Vec<CartLineItemSummary>,
}

impl CartLineItems {
    /// Sum of quantities across physical and digital items.
    pub fn quantity(&self) -> u64 {
        self.physical_items
            .iter()
            .chain(&self.digital_items)
            .map(|item| u64::from(item.quantity))
            .sum()
    }
}

/// A cart as returned by the storefront cart endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontCart {
    #[serde(default)]
    pub id: Option<CartId>,
    #[serde(default)]
    pub line_items: CartLineItems,
}

/// The carts currently owned by the session, in API order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CartSnapshot {
    pub carts: Vec<StorefrontCart>,
}

impl CartSnapshot {
    pub fn new(carts: Vec<StorefrontCart>) -> Self {
        Self { carts }
    }

    /// Identity of the first cart; quantities are not consulted.
    pub fn identity(&self) -> CartIdentity {
        self.carts
            .first()
            .and_then(|cart| cart.id.clone())
            .into()
    }

    /// Total quantity in the first cart, zero when there is none.
    pub fn quantity(&self) -> u64 {
        self.carts
            .first()
            .map(|cart| cart.line_items.quantity())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_has_no_identity() {
        let snapshot: CartSnapshot = serde_json::from_str("[]").unwrap();
        assert_eq!(snapshot.identity(), CartIdentity::None);
        assert_eq!(snapshot.quantity(), 0);
    }

    #[test]
    fn test_first_cart_wins() {
        let snapshot: CartSnapshot = serde_json::from_str(
            r#"[
                {"id": "cart-1", "lineItems": {
                    "physicalItems": [{"productId": 10, "quantity": 2}],
                    "digitalItems": [{"productId": 11, "quantity": 1}],
                    "giftCertificates": []
                }},
                {"id": "cart-2"}
            ]"#,
        )
        .unwrap();

        assert_eq!(snapshot.identity(), CartIdentity::Some(CartId::new("cart-1")));
        assert_eq!(snapshot.quantity(), 3);
    }

    #[test]
    fn test_cart_without_id_is_treated_as_absent() {
        let snapshot: CartSnapshot = serde_json::from_str(r#"[{"lineItems": {}}]"#).unwrap();
        assert!(snapshot.identity().is_none());
    }
}
