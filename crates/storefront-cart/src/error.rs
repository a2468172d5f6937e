//! Cart API error types.

use storefront_data::FetchError;
use thiserror::Error;

/// Errors produced by the storefront cart clients.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartApiError {
    /// The request produced no response.
    #[error("Cart request failed: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("Cart API rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be understood.
    #[error("Invalid cart response: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("Failed to encode cart request: {0}")]
    Encode(String),

    /// Line item quantity below one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),
}

impl CartApiError {
    /// True for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, CartApiError::Network(_))
    }

    /// True when the server answered with a non-success status.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CartApiError::Rejected { .. })
    }
}

impl From<FetchError> for CartApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::RequestError(msg) => CartApiError::Network(msg),
            FetchError::Timeout => CartApiError::Network("request timed out".to_string()),
            FetchError::HttpError { status, message } => CartApiError::Rejected { status, message },
            FetchError::ParseError(msg) => CartApiError::Decode(msg),
            FetchError::JsonError(msg) => CartApiError::Encode(msg),
            FetchError::InvalidUrl(msg) => CartApiError::Network(format!("invalid URL: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_map_onto_cart_taxonomy() {
        let network: CartApiError = FetchError::RequestError("refused".into()).into();
        assert!(network.is_network());

        let rejected: CartApiError = FetchError::HttpError {
            status: 422,
            message: "bad".into(),
        }
        .into();
        assert!(rejected.is_rejection());
        assert_eq!(
            rejected.to_string(),
            "Cart API rejected request with status 422: bad"
        );

        let timeout: CartApiError = FetchError::Timeout.into();
        assert!(timeout.is_network());
    }
}
