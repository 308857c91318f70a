//! Cart line items.

use crate::error::CommerceError;
use crate::ids::{ArtistId, ItemId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Most decimal places a unit price may carry.
pub const MAX_PRICE_SCALE: u32 = 6;

/// Exclusive upper bound on a unit price, in major units.
pub const PRICE_LIMIT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Check that a unit price can live in a cart.
///
/// Prices are persisted as JSON numbers. Within these bounds a price has at
/// most 15 significant digits, so it reads back exactly.
pub fn validate_unit_price(price: Decimal) -> Result<Decimal, CommerceError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CommerceError::NegativePrice(price));
    }
    if price >= PRICE_LIMIT || price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(CommerceError::PriceOutOfRange(price));
    }
    Ok(price)
}

/// Write a price as the JSON number nearest its decimal text.
fn serialize_price<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let value: f64 = price
        .normalize()
        .to_string()
        .parse()
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_f64(value)
}

/// Where a cart entry came from. Used for grouping and messaging only,
/// never for price computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A store product.
    Product,
    /// A gig listing.
    Gig,
    /// A music track.
    Music,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Product => "product",
            ItemKind::Gig => "gig",
            ItemKind::Music => "music",
        }
    }

    /// Parse a kind name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "product" => Some(ItemKind::Product),
            "gig" => Some(ItemKind::Gig),
            "music" | "track" => Some(ItemKind::Music),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cart entry as it is added: everything but the quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub kind: ItemKind,
    pub id: ItemId,
    pub display_name: String,
    pub description: String,
    /// Major units, captured at add time. Checked by [`NewCartItem::new`].
    pub unit_price: Decimal,
    pub image_url: Option<String>,
    pub artist_id: Option<ArtistId>,
    pub subcategory: Option<String>,
}

impl NewCartItem {
    /// Create an entry with the required fields.
    ///
    /// Fails if `unit_price` is negative or outside the range
    /// [`validate_unit_price`] accepts.
    pub fn new(
        kind: ItemKind,
        id: impl Into<ItemId>,
        display_name: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<Self, CommerceError> {
        Ok(Self {
            kind,
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            unit_price: validate_unit_price(unit_price)?,
            image_url: None,
            artist_id: None,
            subcategory: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_artist(mut self, artist_id: impl Into<ArtistId>) -> Self {
        self.artist_id = Some(artist_id.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Turn into a line item with quantity 1.
    pub fn into_line_item(self) -> CartLineItem {
        CartLineItem {
            kind: self.kind,
            id: self.id,
            display_name: self.display_name,
            description: self.description,
            unit_price: self.unit_price,
            quantity: 1,
            image_url: self.image_url,
            artist_id: self.artist_id,
            subcategory: self.subcategory,
        }
    }
}

/// One distinct purchasable entry in the cart.
///
/// This is also the persisted shape; unknown fields are ignored on read and
/// missing optional fields default to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub kind: ItemKind,
    pub id: ItemId,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Major units, written as a JSON number.
    #[serde(serialize_with = "serialize_price")]
    pub unit_price: Decimal,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<ArtistId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

impl CartLineItem {
    /// `unit_price * quantity`, the row subtotal shown to the user.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}
