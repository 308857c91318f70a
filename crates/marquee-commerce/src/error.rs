//! Commerce error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by cart persistence and money arithmetic.
///
/// Checkout has its own user-facing taxonomy in
/// [`CheckoutError`](crate::checkout::CheckoutError).
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// A unit price below zero.
    #[error("Unit price cannot be negative: {0}")]
    NegativePrice(Decimal),

    /// A unit price too large or too finely divided to store exactly.
    #[error(
        "Unit price {0} is out of range: at most {max_scale} decimal places and below {limit}",
        max_scale = crate::cart::MAX_PRICE_SCALE,
        limit = crate::cart::PRICE_LIMIT
    )]
    PriceOutOfRange(Decimal),

    /// A quantity the cart cannot hold.
    #[error("Quantity {0} is out of range (maximum {max})", max = u32::MAX)]
    QuantityOutOfRange(i64),

    /// Cart storage error.
    #[error("Cart storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<marquee_cache::CacheError> for CommerceError {
    fn from(e: marquee_cache::CacheError) -> Self {
        match e {
            marquee_cache::CacheError::SerializeError(e) => {
                CommerceError::SerializationError(e.to_string())
            }
            other => CommerceError::StorageError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
