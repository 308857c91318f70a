//! Cart state and checkout orchestration for the Marquee storefront.
//!
//! - **Cart**: line items for products, gig bookings and music, a persisted
//!   single-writer [`CartStore`](cart::CartStore)
//! - **Checkout**: line-item mapping, the remote commerce API, the checkout
//!   state machine, and the success/failure return pages
//! - **Money**: exact decimal prices and conversion to minor units
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_commerce::prelude::*;
//!
//! let mut cart = CartStore::open(CacheCartRepository::new(Cache::open_default()?));
//! cart.add_item(NewCartItem::new(ItemKind::Music, "track-42", "Night Drive", dec!(1.29))?);
//!
//! let mut checkout = CheckoutOrchestrator::new(api, navigator, CheckoutSettings::for_origin(origin));
//! let phase = checkout.phase_handle(); // e.g. disable the button while phase.is_busy()
//! match checkout.checkout(&cart, CallerRole::User).await {
//!     Ok(_) => {} // the browser is on its way to the payment provider
//!     Err(e) => show_toast(&e.user_message()),
//! }
//! ```

pub mod cart;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod money;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, RoundingPolicy};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{to_minor_units, Currency, Money, RoundingPolicy};

    // Cart
    pub use crate::cart::{
        CacheCartRepository, Cart, CartLineItem, CartPricing, CartRepository, CartStore,
        ItemKind, NewCartItem,
    };

    // Checkout
    pub use crate::checkout::{
        CallerRole, CheckoutError, CheckoutLineItem, CheckoutOrchestrator, CheckoutPhase,
        CheckoutSession, CheckoutSettings, CommerceApi, DonationRequest, FailurePage,
        HttpCommerceApi, Navigator, PaymentStatusPage, PhaseHandle, ReturnRoute, SessionStatus,
        StatusView, SuccessPage,
    };
}
