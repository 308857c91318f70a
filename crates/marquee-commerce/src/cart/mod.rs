//! Shopping cart module.
//!
//! Contains the cart line items, the pure [`Cart`] collection, its pricing
//! breakdown, and the persisted [`CartStore`].

#[allow(clippy::module_inception)]
mod cart;
mod item;
mod pricing;
mod store;

pub use cart::Cart;
pub use item::{
    validate_unit_price, CartLineItem, ItemKind, NewCartItem, MAX_PRICE_SCALE, PRICE_LIMIT,
};
pub use pricing::{CartPricing, RowPricing};
pub use store::{CacheCartRepository, CartRepository, CartStore, DEFAULT_CART_NAMESPACE};
