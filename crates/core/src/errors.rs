//! Error types

use thiserror::Error;

/// Price feed errors
///
/// Every variant means the quote list could not be refreshed; callers keep
/// serving the previous snapshot and offer a retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceFeedError {
    #[error("Price request failed: {0}")]
    Request(String),

    #[error("Price source returned HTTP {0}")]
    Status(u16),

    #[error("Invalid price payload: {0}")]
    Decode(String),
}

impl PriceFeedError {
    /// Message shown next to the retry affordance
    pub fn user_message(&self) -> &'static str {
        "Failed to load token prices. Please try again."
    }
}

/// Swap form validation errors
///
/// These disable the submit action; the display string is the button label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a token to swap from")]
    MissingSourceToken,

    #[error("Select a token to swap to")]
    MissingDestinationToken,

    #[error("Enter an amount")]
    MissingAmount,

    #[error("Amount must be positive")]
    NonPositiveAmount,

    #[error("Select two different tokens")]
    SameToken,

    #[error("Unable to quote this amount")]
    Unquotable,
}

/// Token selection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Token not found: {0}")]
    UnknownToken(String),
}

/// Icon asset could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load icon {url}: {reason}")]
pub struct AssetLoadError {
    pub url: String,
    pub reason: String,
}

/// Core error types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

/// Result type alias
pub type CoreResult<T> = Result<T, CoreError>;
pub type PriceFeedResult<T> = Result<T, PriceFeedError>;
