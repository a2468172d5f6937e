//! Line items sent to the storefront cart API.

use crate::error::CartApiError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Quantity used for every item added in bulk.
pub const BULK_ADD_QUANTITY: u32 = 1;

/// A product and quantity to put into a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: u32,
    pub product_id: ProductId,
}

impl LineItem {
    /// Create a line item, rejecting quantities below one.
    pub fn new(product_id: ProductId, quantity: i64) -> Result<Self, CartApiError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(CartApiError::InvalidQuantity(quantity))?;
        Ok(Self {
            quantity,
            product_id,
        })
    }

    /// A single unit of the product.
    pub fn single(product_id: ProductId) -> Self {
        Self {
            quantity: BULK_ADD_QUANTITY,
            product_id,
        }
    }
}

/// One line item per id, in the given order; duplicates are kept.
pub fn bulk_line_items<'a>(ids: impl IntoIterator<Item = &'a ProductId>) -> Vec<LineItem> {
    ids.into_iter().cloned().map(LineItem::single).collect()
}

/// Body of the create-cart and append-items calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineItemsRequest {
    pub line_items: Vec<LineItem>,
}

impl LineItemsRequest {
    pub fn new(line_items: Vec<LineItem>) -> Self {
        Self { line_items }
    }
}
