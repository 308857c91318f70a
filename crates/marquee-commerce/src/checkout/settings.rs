//! Checkout settings and return URLs.

use crate::money::{Currency, RoundingPolicy};
use serde::{Deserialize, Serialize};

/// Return path after a completed payment.
pub const DEFAULT_SUCCESS_PATH: &str = "/payment-success";

/// Return path after a cancelled or declined payment.
pub const DEFAULT_FAILURE_PATH: &str = "/payment-failed";

/// Placeholder the payment provider replaces with the real session id.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Query parameter carrying the session id on the success return.
pub const SESSION_ID_PARAM: &str = "session_id";

/// How checkout sessions are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// Origin of the storefront, e.g. `https://shop.example.com`.
    pub origin: String,
    pub success_path: String,
    pub failure_path: String,
    /// Currency every line item is charged in.
    pub currency: Currency,
    /// Rounding used when converting prices to minor units.
    pub rounding: RoundingPolicy,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            success_path: DEFAULT_SUCCESS_PATH.to_string(),
            failure_path: DEFAULT_FAILURE_PATH.to_string(),
            currency: Currency::default(),
            rounding: RoundingPolicy::default(),
        }
    }
}

/// The two URLs the payment provider sends the browser back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnUrls {
    pub success: String,
    pub failure: String,
}

impl CheckoutSettings {
    /// Settings for a given origin with everything else defaulted.
    pub fn for_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    /// Build both return URLs from the origin.
    pub fn return_urls(&self) -> ReturnUrls {
        let origin = self.origin.trim_end_matches('/');
        ReturnUrls {
            success: format!(
                "{}{}?{}={}",
                origin,
                normalize_path(&self.success_path),
                SESSION_ID_PARAM,
                SESSION_ID_PLACEHOLDER
            ),
            failure: format!("{}{}", origin, normalize_path(&self.failure_path)),
        }
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_urls() {
        let urls = CheckoutSettings::for_origin("https://shop.example.com/").return_urls();
        assert_eq!(
            urls.success,
            "https://shop.example.com/payment-success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.failure, "https://shop.example.com/payment-failed");
    }

    #[test]
    fn test_paths_are_normalized() {
        let settings = CheckoutSettings {
            success_path: "thanks/".to_string(),
            ..CheckoutSettings::for_origin("https://a.example")
        };
        assert!(settings.return_urls().success.starts_with("https://a.example/thanks?"));
    }

    #[test]
    fn test_partial_settings_deserialize_with_defaults() {
        let settings: CheckoutSettings =
            serde_json::from_str(r#"{"origin": "https://x.example", "rounding": "half_even"}"#)
                .unwrap();
        assert_eq!(settings.success_path, DEFAULT_SUCCESS_PATH);
        assert_eq!(settings.rounding, RoundingPolicy::HalfEven);
        assert_eq!(settings.currency, Currency::USD);
    }
}
