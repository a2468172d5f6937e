//! Page controller error types.

use storefront_cart::CartApiError;
use thiserror::Error;

/// Errors surfaced by the category page controller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// A cart API call failed.
    #[error(transparent)]
    Cart(#[from] CartApiError),

    /// Client storage refused a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Page context or controller configuration is malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A navigation URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl From<serde_json::Error> for PageError {
    fn from(e: serde_json::Error) -> Self {
        PageError::Config(e.to_string())
    }
}

impl From<url::ParseError> for PageError {
    fn from(e: url::ParseError) -> Self {
        PageError::Url(e.to_string())
    }
}
