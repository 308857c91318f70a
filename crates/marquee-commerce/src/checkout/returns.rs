//! Terminal pages the payment provider redirects back to.

use crate::cart::{CartLineItem, CartRepository, CartStore, ItemKind};
use crate::checkout::settings::{normalize_path, SESSION_ID_PARAM, SESSION_ID_PLACEHOLDER};
use crate::checkout::CheckoutSettings;
use crate::ids::CheckoutSessionId;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

/// The two fixed return routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnRoute {
    Success,
    Failure,
}

/// A parsed arrival on a return route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnVisit {
    pub route: ReturnRoute,
    pub session_id: Option<CheckoutSessionId>,
}

impl ReturnRoute {
    /// Match a path against the configured return paths.
    pub fn from_path(path: &str, settings: &CheckoutSettings) -> Option<Self> {
        let path = normalize_path(path);
        if path == normalize_path(&settings.success_path) {
            Some(ReturnRoute::Success)
        } else if path == normalize_path(&settings.failure_path) {
            Some(ReturnRoute::Failure)
        } else {
            None
        }
    }

    /// Match a full URL or a path with query, e.g.
    /// `https://shop.example/payment-success?session_id=cs_1`.
    pub fn from_url(url: &str, settings: &CheckoutSettings) -> Option<ReturnVisit> {
        let uri: http::Uri = url.trim().parse().ok()?;
        let route = Self::from_path(uri.path(), settings)?;
        let session_id = uri.query().and_then(parse_session_id);
        Some(ReturnVisit { route, session_id })
    }
}

/// Pull `session_id` out of a query string.
///
/// The unreplaced provider placeholder counts as absent.
pub fn parse_session_id(query: &str) -> Option<CheckoutSessionId> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SESSION_ID_PARAM)
        .map(|(_, value)| decode_query_value(value))
        .filter(|value| !value.trim().is_empty() && value != SESSION_ID_PLACEHOLDER)
        .map(CheckoutSessionId::new)
}

/// Form-style decoding: `+` is a space, malformed escapes are kept verbatim.
fn decode_query_value(value: &str) -> String {
    percent_decode_str(&value.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// What a finished purchase contained, for the confirmation wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseSummary {
    /// Nothing known, e.g. the page was reloaded after the cart was cleared.
    Empty,
    /// Every item was of one kind.
    Only(ItemKind),
    Mixed,
}

impl PurchaseSummary {
    pub fn classify(items: &[CartLineItem]) -> Self {
        let mut kinds = items.iter().map(|item| item.kind);
        match kinds.next() {
            None => PurchaseSummary::Empty,
            Some(first) if kinds.all(|kind| kind == first) => PurchaseSummary::Only(first),
            Some(_) => PurchaseSummary::Mixed,
        }
    }

    /// Confirmation text for this kind of purchase.
    pub fn message(&self) -> &'static str {
        match self {
            PurchaseSummary::Empty => "Thank you for your purchase! Your payment was successful.",
            PurchaseSummary::Only(ItemKind::Product) => {
                "Thank you for your order! You'll receive a confirmation email with shipping details."
            }
            PurchaseSummary::Only(ItemKind::Gig) => {
                "Your booking is confirmed! The artist will be in touch with the details."
            }
            PurchaseSummary::Only(ItemKind::Music) => {
                "Thank you! Your music is now available in your library."
            }
            PurchaseSummary::Mixed => {
                "Thank you for your purchase! You'll receive a confirmation email for each item."
            }
        }
    }
}

/// Shown after a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub summary: PurchaseSummary,
    pub message: String,
    pub session_id: Option<CheckoutSessionId>,
    /// Units removed from the cart.
    pub items_cleared: u64,
}

/// The success return page.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessPage;

impl SuccessPage {
    /// Read the cart once to word the confirmation, then clear it.
    ///
    /// Running this again on an already-empty cart gives the generic message.
    pub fn resume<R: CartRepository>(
        cart: &mut CartStore<R>,
        session_id: Option<CheckoutSessionId>,
    ) -> Confirmation {
        let summary = PurchaseSummary::classify(cart.items());
        let items_cleared = cart.get_cart_item_count();
        cart.clear_cart();

        tracing::info!(
            session = ?session_id.as_ref().map(|id| id.as_str()),
            summary = ?summary,
            items_cleared,
            "payment succeeded, cart cleared"
        );

        Confirmation {
            summary,
            message: summary.message().to_string(),
            session_id,
            items_cleared,
        }
    }
}

/// Shown after a cancelled or declined payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetryGuidance {
    /// Units still waiting in the cart.
    pub item_count: u64,
    pub message: String,
}

/// The failure return page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailurePage;

impl FailurePage {
    /// Describe how to retry. The cart is left as it is.
    pub fn resume<R: CartRepository>(cart: &CartStore<R>) -> RetryGuidance {
        let item_count = cart.get_cart_item_count();
        tracing::info!(item_count, "payment not completed, cart kept");

        let message = if item_count == 0 {
            "Your payment was not completed. No charges were made.".to_string()
        } else {
            format!(
                "Your payment was not completed. No charges were made. \
                 Your cart still has {} {}, so you can try again.",
                item_count,
                if item_count == 1 { "item" } else { "items" }
            )
        };
        RetryGuidance {
            item_count,
            message,
        }
    }
}
