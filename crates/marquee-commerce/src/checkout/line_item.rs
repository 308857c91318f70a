//! Mapping cart entries to payment-provider line items.

use crate::cart::{CartLineItem, ItemKind};
use crate::checkout::CheckoutError;
use crate::ids::ArtistId;
use crate::money::{to_minor_units, Currency, RoundingPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a checkout session, as the commerce backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineItem {
    pub product_name: String,
    pub product_description: String,
    /// Unit price in minor units (cents).
    pub price_in_minor_units: i64,
    pub quantity: u32,
    /// Lower-case ISO code, e.g. "usd".
    pub currency_code: String,
}

impl CheckoutLineItem {
    /// Map a cart entry, converting its major-unit price.
    ///
    /// An empty description falls back to the display name, since providers
    /// reject blank descriptions.
    pub fn from_cart_item(
        item: &CartLineItem,
        currency: Currency,
        policy: RoundingPolicy,
    ) -> Result<Self, CheckoutError> {
        let price = to_minor_units(item.unit_price, currency, policy).map_err(|e| {
            CheckoutError::InvalidLineItem(format!("{}: {}", item.display_name, e))
        })?;

        let description = if item.description.trim().is_empty() {
            describe_kind(item.kind, &item.display_name)
        } else {
            item.description.clone()
        };

        Ok(Self {
            product_name: item.display_name.clone(),
            product_description: description,
            price_in_minor_units: price,
            quantity: item.quantity,
            currency_code: currency.wire_code(),
        })
    }

    /// `price * quantity`, if it fits.
    pub fn line_total(&self) -> Option<i64> {
        self.price_in_minor_units
            .checked_mul(i64::from(self.quantity))
    }
}

fn describe_kind(kind: ItemKind, name: &str) -> String {
    match kind {
        ItemKind::Product => name.to_string(),
        ItemKind::Gig => format!("Booking: {}", name),
        ItemKind::Music => format!("Track: {}", name),
    }
}

/// Map every cart entry, in cart order.
pub fn map_cart_items(
    items: &[CartLineItem],
    currency: Currency,
    policy: RoundingPolicy,
) -> Result<Vec<CheckoutLineItem>, CheckoutError> {
    items
        .iter()
        .map(|item| CheckoutLineItem::from_cart_item(item, currency, policy))
        .collect()
}

/// Check line items before they are submitted.
pub fn validate_line_items(items: &[CheckoutLineItem]) -> Result<(), CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut total: i64 = 0;
    for item in items {
        let name = item.product_name.trim();
        if name.is_empty() {
            return Err(CheckoutError::InvalidLineItem(
                "product name is required".to_string(),
            ));
        }
        if item.quantity == 0 {
            return Err(CheckoutError::InvalidLineItem(format!(
                "{}: quantity must be at least 1",
                name
            )));
        }
        if item.price_in_minor_units < 0 {
            return Err(CheckoutError::InvalidLineItem(format!(
                "{}: price cannot be negative",
                name
            )));
        }
        if item.currency_code.trim().is_empty() {
            return Err(CheckoutError::InvalidLineItem(format!(
                "{}: currency is required",
                name
            )));
        }
        total = item
            .line_total()
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| {
                CheckoutError::InvalidLineItem(format!("{}: amount is too large", name))
            })?;
    }
    Ok(())
}

/// Sum of `price * quantity` over all lines, in minor units.
pub fn submitted_total(items: &[CheckoutLineItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.line_total()?))
}

/// A one-off donation to an artist, checked out without the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub artist_id: ArtistId,
    pub artist_name: String,
    /// Major units.
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DonationRequest {
    /// The single line item for this donation.
    pub fn to_line_item(
        &self,
        currency: Currency,
        policy: RoundingPolicy,
    ) -> Result<CheckoutLineItem, CheckoutError> {
        if self.amount <= Decimal::ZERO {
            return Err(CheckoutError::InvalidLineItem(
                "donation amount must be positive".to_string(),
            ));
        }
        let price = to_minor_units(self.amount, currency, policy)
            .map_err(|e| CheckoutError::InvalidLineItem(format!("donation: {}", e)))?;
        if price == 0 {
            return Err(CheckoutError::InvalidLineItem(
                "donation amount is below the smallest currency unit".to_string(),
            ));
        }

        let description = match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => format!("Support for {}", self.artist_name),
        };

        Ok(CheckoutLineItem {
            product_name: format!("Donation to {}", self.artist_name),
            product_description: description,
            price_in_minor_units: price,
            quantity: 1,
            currency_code: currency.wire_code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, NewCartItem};

    fn line(name: &str, price: i64, quantity: u32) -> CheckoutLineItem {
        CheckoutLineItem {
            product_name: name.to_string(),
            product_description: name.to_string(),
            price_in_minor_units: price,
            quantity,
            currency_code: "usd".to_string(),
        }
    }

    #[test]
    fn test_price_conversion_matches_cart_total() {
        let mut cart = Cart::new();
        cart.add_item(
            NewCartItem::new(ItemKind::Product, "p", "Poster", Decimal::new(999, 2)).unwrap(),
        );
        cart.update_quantity(&"p".into(), 3).unwrap();

        let items = map_cart_items(cart.items(), Currency::USD, RoundingPolicy::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price_in_minor_units, 999);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].currency_code, "usd");

        let expected =
            to_minor_units(cart.total(), Currency::USD, RoundingPolicy::default()).unwrap();
        assert_eq!(submitted_total(&items), Some(2997));
        assert_eq!(submitted_total(&items), Some(expected));
    }

    #[test]
    fn test_description_fallback() {
        let gig = NewCartItem::new(ItemKind::Gig, "g", "Jazz trio", Decimal::new(30000, 2))
            .unwrap()
            .into_line_item();
        let mapped =
            CheckoutLineItem::from_cart_item(&gig, Currency::USD, RoundingPolicy::default())
                .unwrap();
        assert_eq!(mapped.product_description, "Booking: Jazz trio");

        let product = NewCartItem::new(ItemKind::Product, "p", "Mug", Decimal::ONE)
            .unwrap()
            .with_description("Ceramic, 350ml")
            .into_line_item();
        let mapped =
            CheckoutLineItem::from_cart_item(&product, Currency::USD, RoundingPolicy::default())
                .unwrap();
        assert_eq!(mapped.product_description, "Ceramic, 350ml");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(line("Poster", 999, 3)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productName": "Poster",
                "productDescription": "Poster",
                "priceInMinorUnits": 999,
                "quantity": 3,
                "currencyCode": "usd"
            })
        );
    }

    #[test]
    fn test_validation() {
        assert_eq!(validate_line_items(&[]), Err(CheckoutError::EmptyCart));
        assert!(validate_line_items(&[line("Poster", 999, 1), line("Free zine", 0, 2)]).is_ok());

        assert!(matches!(
            validate_line_items(&[line(" ", 999, 1)]),
            Err(CheckoutError::InvalidLineItem(_))
        ));
        assert!(matches!(
            validate_line_items(&[line("Poster", 999, 0)]),
            Err(CheckoutError::InvalidLineItem(_))
        ));
        assert!(matches!(
            validate_line_items(&[line("Poster", -1, 1)]),
            Err(CheckoutError::InvalidLineItem(_))
        ));
        assert!(matches!(
            validate_line_items(&[line("Huge", i64::MAX, 2)]),
            Err(CheckoutError::InvalidLineItem(_))
        ));
    }

    #[test]
    fn test_donation_line_item() {
        let donation = DonationRequest {
            artist_id: ArtistId::new("artist-1"),
            artist_name: "Mira".to_string(),
            amount: Decimal::new(1500, 2),
            message: None,
        };
        let line = donation
            .to_line_item(Currency::USD, RoundingPolicy::default())
            .unwrap();
        assert_eq!(line.product_name, "Donation to Mira");
        assert_eq!(line.product_description, "Support for Mira");
        assert_eq!(line.price_in_minor_units, 1500);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_donation_must_be_positive() {
        let mut donation = DonationRequest {
            artist_id: ArtistId::new("artist-1"),
            artist_name: "Mira".to_string(),
            amount: Decimal::ZERO,
            message: Some("keep going".to_string()),
        };
        assert!(donation
            .to_line_item(Currency::USD, RoundingPolicy::default())
            .is_err());

        donation.amount = Decimal::new(1, 3); // 0.001 rounds to zero cents
        assert!(donation
            .to_line_item(Currency::USD, RoundingPolicy::default())
            .is_err());
    }
}
