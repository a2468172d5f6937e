//! Storefront cart API clients.

use async_trait::async_trait;
use serde::Deserialize;
use storefront_data::{FetchClient, Response};

use crate::error::CartApiError;
use crate::ids::CartId;
use crate::line_item::{LineItem, LineItemsRequest};
use crate::snapshot::{CartIdentity, CartSnapshot};

/// Cart retrieval endpoint.
pub const CART_PATH: &str = "/api/storefront/cart";
/// Prefix for per-cart endpoints; the cart id follows.
pub const CARTS_PATH: &str = "/api/storefront/carts/";
/// Line item options expanded when reading the cart.
pub const CART_INCLUDE: &str = "lineItems.digitalItems.options,lineItems.physicalItems.options";

/// What a successful create or append reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartMutationResult {
    pub status: u16,
    /// Cart id echoed in the response body, when present.
    pub cart_id: Option<CartId>,
}

/// Reads the session's current cart.
#[async_trait(?Send)]
pub trait CartSnapshotClient: Send + Sync {
    /// Fetch all carts owned by the session.
    async fn fetch_snapshot(&self) -> Result<CartSnapshot, CartApiError>;

    /// Identity of the current cart.
    async fn fetch_current_cart(&self) -> Result<CartIdentity, CartApiError> {
        Ok(self.fetch_snapshot().await?.identity())
    }
}

/// Creates, extends and deletes carts. Every call is one-shot.
#[async_trait(?Send)]
pub trait CartMutationClient: Send + Sync {
    async fn create_cart(
        &self,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError>;

    async fn append_line_items(
        &self,
        cart_id: &CartId,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError>;

    async fn delete_cart(&self, cart_id: &CartId) -> Result<(), CartApiError>;
}

/// [`CartSnapshotClient`] and [`CartMutationClient`] over HTTP.
#[derive(Debug, Clone)]
pub struct StorefrontCartApi {
    client: FetchClient,
}

impl StorefrontCartApi {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    fn cart_url(cart_id: &CartId) -> String {
        format!("{}{}", CARTS_PATH, cart_id)
    }

    async fn post_line_items(
        &self,
        url: String,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError> {
        let body = LineItemsRequest::new(line_items.to_vec());
        let response = self
            .client
            .post(url)
            .accept("application/json")
            .json(&body)?
            .send()
            .await?
            .error_for_status()?;
        Ok(mutation_result(&response))
    }
}

#[async_trait(?Send)]
impl CartSnapshotClient for StorefrontCartApi {
    async fn fetch_snapshot(&self) -> Result<CartSnapshot, CartApiError> {
        let url = format!("{}/?include={}", CART_PATH, CART_INCLUDE);
        let snapshot: CartSnapshot = self
            .client
            .get(url)
            .accept("application/json")
            .send()
            .await?
            .error_for_status()?
            .json()?;
        tracing::debug!(carts = snapshot.carts.len(), "fetched cart snapshot");
        Ok(snapshot)
    }
}

#[async_trait(?Send)]
impl CartMutationClient for StorefrontCartApi {
    async fn create_cart(
        &self,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError> {
        self.post_line_items(CART_PATH.to_string(), line_items).await
    }

    async fn append_line_items(
        &self,
        cart_id: &CartId,
        line_items: &[LineItem],
    ) -> Result<CartMutationResult, CartApiError> {
        let url = format!("{}/items", Self::cart_url(cart_id));
        self.post_line_items(url, line_items).await
    }

    async fn delete_cart(&self, cart_id: &CartId) -> Result<(), CartApiError> {
        self.client
            .delete(Self::cart_url(cart_id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn mutation_result(response: &Response) -> CartMutationResult {
    #[derive(Deserialize)]
    struct Echo {
        id: Option<CartId>,
        data: Option<Box<Echo>>,
    }

    let cart_id = response.json::<Echo>().ok().and_then(|echo| {
        echo.id
            .or_else(|| echo.data.and_then(|inner| inner.id))
    });

    CartMutationResult {
        status: response.status,
        cart_id,
    }
}
