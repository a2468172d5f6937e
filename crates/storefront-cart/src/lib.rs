//! Cart domain types and storefront cart API clients.
//!
//! - **Ids**: `ProductId`, `CartId`
//! - **Line items**: what gets posted when adding products in bulk
//! - **Snapshot**: the session's current cart and its `CartIdentity`
//! - **Clients**: `CartSnapshotClient` and `CartMutationClient`, implemented
//!   over HTTP by `StorefrontCartApi`
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cart::prelude::*;
//!
//! let api = StorefrontCartApi::new(fetch_client);
//! let items = bulk_line_items(&product_ids);
//!
//! match api.fetch_current_cart().await? {
//!     CartIdentity::Some(id) => api.append_line_items(&id, &items).await?,
//!     CartIdentity::None => api.create_cart(&items).await?,
//! };
//! ```

pub mod client;
pub mod error;
pub mod ids;
pub mod line_item;
pub mod snapshot;

pub use client::{
    CartMutationClient, CartMutationResult, CartSnapshotClient, StorefrontCartApi, CARTS_PATH,
    CART_INCLUDE, CART_PATH,
};
pub use error::CartApiError;
pub use ids::{CartId, ProductId};
pub use line_item::{bulk_line_items, LineItem, LineItemsRequest, BULK_ADD_QUANTITY};
pub use snapshot::{CartIdentity, CartLineItemSummary, CartLineItems, CartSnapshot, StorefrontCart};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::client::{CartMutationClient, CartSnapshotClient, StorefrontCartApi};
    pub use crate::error::CartApiError;
    pub use crate::ids::{CartId, ProductId};
    pub use crate::line_item::{bulk_line_items, LineItem};
    pub use crate::snapshot::{CartIdentity, CartSnapshot};
}
