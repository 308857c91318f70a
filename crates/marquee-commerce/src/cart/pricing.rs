//! Cart pricing breakdown.

use crate::error::CommerceError;
use crate::ids::ItemId;
use crate::money::{to_minor_units, Currency, Money, RoundingPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart.
///
/// `total` is the exact sum of the row subtotals; nothing is rounded
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPricing {
    /// Per-row breakdown, in cart order.
    pub rows: Vec<RowPricing>,
    /// Sum of quantities.
    pub item_count: u64,
    /// Sum of row subtotals, major units.
    pub total: Decimal,
}

impl CartPricing {
    /// Format the total for display (e.g., "$29.97").
    pub fn display_total(&self, currency: Currency) -> String {
        currency.format_major(self.total)
    }

    /// The total in minor units.
    pub fn total_minor(
        &self,
        currency: Currency,
        policy: RoundingPolicy,
    ) -> Result<Money, CommerceError> {
        Money::from_major(self.total, currency, policy)
    }
}

/// Pricing for a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPricing {
    pub id: ItemId,
    /// Unit price, major units.
    pub unit_price: Decimal,
    pub quantity: u32,
    /// `unit_price * quantity`, major units.
    pub subtotal: Decimal,
}

impl RowPricing {
    /// Format the row subtotal for display.
    pub fn display_subtotal(&self, currency: Currency) -> String {
        currency.format_major(self.subtotal)
    }

    /// The unit price in minor units.
    pub fn unit_price_minor(
        &self,
        currency: Currency,
        policy: RoundingPolicy,
    ) -> Result<i64, CommerceError> {
        to_minor_units(self.unit_price, currency, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let pricing = CartPricing {
            rows: vec![RowPricing {
                id: ItemId::new("a"),
                unit_price: Decimal::new(999, 2),
                quantity: 3,
                subtotal: Decimal::new(2997, 2),
            }],
            item_count: 3,
            total: Decimal::new(2997, 2),
        };

        assert_eq!(pricing.display_total(Currency::USD), "$29.97");
        assert_eq!(pricing.rows[0].display_subtotal(Currency::EUR), "\u{20ac}29.97");
        assert_eq!(
            pricing
                .total_minor(Currency::USD, RoundingPolicy::default())
                .unwrap()
                .amount_minor,
            2997
        );
        assert_eq!(
            pricing.rows[0]
                .unit_price_minor(Currency::USD, RoundingPolicy::default())
                .unwrap(),
            999
        );
    }
}
