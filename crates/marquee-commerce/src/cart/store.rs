//! The persisted cart store.

use crate::cart::{Cart, CartLineItem, CartPricing, NewCartItem};
use crate::error::CommerceError;
use crate::ids::ItemId;
use marquee_cache::{cache_key, Cache};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default storage namespace for the cart record.
pub const DEFAULT_CART_NAMESPACE: &str = "marquee";

/// Record name under the namespace.
const CART_RECORD: &str = "cart";

/// Current persisted format version.
const CART_FORMAT_VERSION: u32 = 1;

/// Where the cart is loaded from and saved to.
pub trait CartRepository {
    /// Load the persisted cart; a missing record is an empty cart.
    fn load(&self) -> Result<Cart, CommerceError>;

    /// Persist the full cart, replacing what was stored.
    fn save(&self, cart: &Cart) -> Result<(), CommerceError>;
}

#[derive(Serialize)]
struct PersistedCartRef<'a> {
    version: u32,
    items: &'a [CartLineItem],
}

/// Items are read one at a time so a single unreadable entry doesn't cost
/// the rest of the cart.
#[derive(Deserialize)]
struct PersistedCart {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// [`CartRepository`] over a [`Cache`], storing one JSON record
/// `{ "version": 1, "items": [...] }` under `<namespace>:cart`.
#[derive(Debug)]
pub struct CacheCartRepository {
    cache: Cache,
    key: String,
}

impl CacheCartRepository {
    /// Use the default namespace.
    pub fn new(cache: Cache) -> Self {
        Self::with_namespace(cache, DEFAULT_CART_NAMESPACE)
    }

    /// Use a custom namespace, e.g. to keep two storefronts apart.
    pub fn with_namespace(cache: Cache, namespace: &str) -> Self {
        Self {
            cache,
            key: cache_key!(namespace, CART_RECORD),
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl CartRepository for CacheCartRepository {
    fn load(&self) -> Result<Cart, CommerceError> {
        match self.cache.get::<PersistedCart>(&self.key)? {
            Some(record) => {
                if record.version > CART_FORMAT_VERSION {
                    tracing::debug!(
                        version = record.version,
                        "cart record written by a newer format, reading known fields"
                    );
                }
                let items = record.items.into_iter().enumerate().filter_map(|(index, raw)| {
                    serde_json::from_value::<CartLineItem>(raw)
                        .map_err(|e| {
                            tracing::warn!(index, error = %e, "skipping unreadable cart item");
                        })
                        .ok()
                });
                Ok(Cart::from_items(items))
            }
            None => Ok(Cart::new()),
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), CommerceError> {
        let record = PersistedCartRef {
            version: CART_FORMAT_VERSION,
            items: cart.items(),
        };
        self.cache.set(&self.key, &record)?;
        Ok(())
    }
}

/// The single source of truth for pending purchases.
///
/// One instance lives for the lifetime of the application and is handed to
/// whatever needs it. All mutation goes through `&mut self`, so there is
/// exactly one writer. Every mutation is saved before it returns; if saving
/// fails the in-memory cart stays authoritative and the failure is logged.
#[derive(Debug)]
pub struct CartStore<R> {
    cart: Cart,
    repo: R,
}

impl<R: CartRepository> CartStore<R> {
    /// Open the store, loading whatever was persisted.
    ///
    /// Unreadable data is logged and replaced by an empty cart.
    pub fn open(repo: R) -> Self {
        let cart = match repo.load() {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable persisted cart");
                Cart::new()
            }
        };
        tracing::debug!(items = cart.len(), "cart store opened");
        Self { cart, repo }
    }

    /// Add one unit of `entry`, merging by id.
    pub fn add_item(&mut self, entry: NewCartItem) {
        let id = entry.id.clone();
        let quantity = self.cart.add_item(entry);
        tracing::debug!(item = %id, quantity, "cart item added");
        self.persist();
    }

    /// Remove an item; absent ids are ignored.
    pub fn remove_item(&mut self, id: &ItemId) {
        if self.cart.remove_item(id) {
            tracing::debug!(item = %id, "cart item removed");
            self.persist();
        }
    }

    /// Set an item's quantity; `quantity <= 0` removes it.
    ///
    /// Quantities the cart cannot hold are refused before anything changes.
    pub fn update_quantity(
        &mut self,
        id: &ItemId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if self.cart.update_quantity(id, quantity)? {
            tracing::debug!(item = %id, quantity, "cart quantity updated");
            self.persist();
        }
        Ok(())
    }

    /// Empty the cart unconditionally.
    ///
    /// Unlike the other mutations this saves even when the cart was already
    /// empty, so a stale record left by another writer is overwritten too.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    /// Items in cart order.
    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    /// Sum of quantities.
    pub fn get_cart_item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of row subtotals, major units.
    pub fn get_cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Per-row pricing plus total.
    pub fn pricing(&self) -> CartPricing {
        self.cart.pricing()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Borrow the current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The backing repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save(&self.cart) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }
}
