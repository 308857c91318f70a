//! Checkout errors shown to the user.

use thiserror::Error;

const GENERIC_FAILURE: &str = "Failed to process checkout. Please try again.";

/// Everything that can stop a checkout attempt.
///
/// None of these are fatal: the cart is untouched and the user can retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing to buy.
    #[error("Cart is empty")]
    EmptyCart,

    /// The platform has no payment provider set up.
    #[error("Payment provider is not configured")]
    ProviderNotConfigured { is_admin: bool },

    /// An item that cannot be sent to the payment provider.
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    /// The backend rejected the request or could not be reached.
    #[error("Failed to create checkout session: {0}")]
    SessionCreationFailed(String),

    /// The backend answered but gave no usable redirect URL.
    #[error("Checkout session has no redirect URL")]
    SessionMissingRedirect,
}

/// Broad error classes, by where they are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Detected locally from cart contents.
    Validation,
    /// Detected from platform configuration, before any session is requested.
    Configuration,
    /// The backend broke its response contract.
    ContractViolation,
    /// Network or backend failure.
    Transport,
}

impl CheckoutError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CheckoutError::EmptyCart | CheckoutError::InvalidLineItem(_) => ErrorClass::Validation,
            CheckoutError::ProviderNotConfigured { .. } => ErrorClass::Configuration,
            CheckoutError::SessionMissingRedirect => ErrorClass::ContractViolation,
            CheckoutError::SessionCreationFailed(_) => ErrorClass::Transport,
        }
    }

    /// The message to show the user.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => {
                "Your cart is empty. Add something before checking out.".to_string()
            }
            CheckoutError::ProviderNotConfigured { is_admin: true } => {
                "Payments are not set up yet. Add the payment provider keys in the admin \
                 payment settings to enable checkout."
                    .to_string()
            }
            CheckoutError::ProviderNotConfigured { is_admin: false } => {
                "Checkout is currently unavailable. Please try again later.".to_string()
            }
            CheckoutError::InvalidLineItem(reason) => {
                format!("An item in your cart can't be purchased: {}", reason)
            }
            CheckoutError::SessionCreationFailed(reason) if !reason.trim().is_empty() => {
                reason.clone()
            }
            CheckoutError::SessionCreationFailed(_) => GENERIC_FAILURE.to_string(),
            CheckoutError::SessionMissingRedirect => {
                "We couldn't start the payment. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(CheckoutError::EmptyCart.class(), ErrorClass::Validation);
        assert_eq!(
            CheckoutError::ProviderNotConfigured { is_admin: false }.class(),
            ErrorClass::Configuration
        );
        assert_eq!(
            CheckoutError::SessionMissingRedirect.class(),
            ErrorClass::ContractViolation
        );
        assert_eq!(
            CheckoutError::SessionCreationFailed("x".to_string()).class(),
            ErrorClass::Transport
        );
    }

    #[test]
    fn test_provider_message_depends_on_role() {
        let admin = CheckoutError::ProviderNotConfigured { is_admin: true }.user_message();
        let user = CheckoutError::ProviderNotConfigured { is_admin: false }.user_message();
        assert!(admin.contains("admin payment settings"));
        assert!(!user.contains("admin"));
        assert_ne!(admin, user);
    }

    #[test]
    fn test_session_failure_message_falls_back() {
        assert_eq!(
            CheckoutError::SessionCreationFailed("Card declined".to_string()).user_message(),
            "Card declined"
        );
        assert_eq!(
            CheckoutError::SessionCreationFailed("  ".to_string()).user_message(),
            GENERIC_FAILURE
        );
    }
}
