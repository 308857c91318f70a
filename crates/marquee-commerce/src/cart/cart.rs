//! The cart collection and its mutation laws.

use crate::cart::{validate_unit_price, CartLineItem, CartPricing, NewCartItem, RowPricing};
use crate::error::CommerceError;
use crate::ids::ItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An ordered collection of line items, unique by [`ItemId`].
///
/// `Cart` is plain data; persistence lives in [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored items, restoring the invariants.
    ///
    /// Items with quantity 0 or a price [`NewCartItem::new`] would refuse are
    /// dropped. Repeated ids are merged into the first occurrence with their
    /// quantities summed.
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            if let Err(e) = validate_unit_price(item.unit_price) {
                tracing::warn!(item = %item.id, error = %e, "dropping stored item");
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of an entry.
    ///
    /// If the id is already present its quantity grows by one and every other
    /// field (price, name, ...) is left as first added. Returns the new quantity.
    pub fn add_item(&mut self, entry: NewCartItem) -> u32 {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == entry.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return existing.quantity;
        }
        self.items.push(entry.into_line_item());
        1
    }

    /// Remove an item. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() < len_before
    }

    /// Set an item's quantity.
    ///
    /// `quantity <= 0` removes the item. A quantity above `u32::MAX` is
    /// refused and the cart is left untouched. Returns whether the cart changed.
    pub fn update_quantity(
        &mut self,
        id: &ItemId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(id));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| CommerceError::QuantityOutOfRange(quantity))?;
        Ok(match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        })
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of row subtotals, in major units.
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.subtotal()))
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Get an item by id.
    pub fn get_item(&self, id: &ItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Per-row subtotals plus their sum.
    pub fn pricing(&self) -> CartPricing {
        let rows: Vec<RowPricing> = self
            .items
            .iter()
            .map(|item| RowPricing {
                id: item.id.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                subtotal: item.subtotal(),
            })
            .collect();

        let total = rows
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.subtotal));

        CartPricing {
            item_count: self.item_count(),
            total,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ItemKind;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn entry(id: &str, cents: i64) -> NewCartItem {
        NewCartItem::new(ItemKind::Product, id, format!("Item {}", id), Decimal::new(cents, 2))
            .unwrap()
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(entry("a", 1000)), 1);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 1000));
        assert_eq!(cart.add_item(entry("a", 1000)), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_re_add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 1000));
        let mut changed = entry("a", 1500);
        changed.display_name = "Renamed".to_string();
        cart.add_item(changed);

        let item = cart.get_item(&ItemId::new("a")).unwrap();
        assert_eq!(item.unit_price, Decimal::new(1000, 2));
        assert_eq!(item.display_name, "Item a");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 1000));
        cart.add_item(entry("a", 1000));

        assert!(cart.update_quantity(&ItemId::new("a"), 5).unwrap());
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_rejects_out_of_range() {
        let mut cart = Cart::new();
        cart.add_item(entry("p", 1000));

        let err = cart
            .update_quantity(&ItemId::new("p"), 5_000_000_000)
            .unwrap_err();
        assert!(matches!(err, CommerceError::QuantityOutOfRange(5_000_000_000)));
        assert_eq!(cart.get_item(&ItemId::new("p")).unwrap().quantity, 1);

        assert!(cart
            .update_quantity(&ItemId::new("p"), i64::from(u32::MAX))
            .unwrap());
        assert_eq!(cart.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 1000));
        cart.add_item(entry("b", 1000));

        assert!(cart.update_quantity(&ItemId::new("a"), 0).unwrap());
        assert!(cart.update_quantity(&ItemId::new("b"), -3).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 1000));

        assert!(!cart.remove_item(&ItemId::new("zzz")));
        assert!(!cart.update_quantity(&ItemId::new("zzz"), 4).unwrap());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_empty_cart_aggregates() {
        let cart = Cart::new();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
        assert!(cart.pricing().rows.is_empty());
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 999));
        cart.update_quantity(&ItemId::new("a"), 3).unwrap();
        cart.add_item(entry("b", 2000));

        assert_eq!(cart.total(), Decimal::new(4997, 2));
        assert_eq!(cart.pricing().total, cart.total());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(entry("a", 999));
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let mut zero = entry("z", 100).into_line_item();
        zero.quantity = 0;
        let mut dup = entry("a", 100).into_line_item();
        dup.quantity = 2;

        let mut negative = entry("n", 100).into_line_item();
        negative.unit_price = Decimal::new(-100, 2);
        let mut huge = entry("h", 100).into_line_item();
        huge.unit_price = Decimal::MAX;

        let cart = Cart::from_items(vec![
            entry("a", 100).into_line_item(),
            zero,
            negative,
            dup,
            huge,
        ]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get_item(&ItemId::new("a")).unwrap().quantity, 3);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Remove(u8),
        Update(u8, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..5).prop_map(Op::Add),
            (0u8..5).prop_map(Op::Remove),
            (0u8..5, -3i64..20).prop_map(|(id, q)| Op::Update(id, q)),
        ]
    }

    fn apply(cart: &mut Cart, op: &Op) {
        match op {
            Op::Add(id) => {
                cart.add_item(entry(&format!("i{}", id), 100 + i64::from(*id) * 37));
            }
            Op::Remove(id) => {
                cart.remove_item(&ItemId::new(format!("i{}", id)));
            }
            Op::Update(id, q) => {
                cart.update_quantity(&ItemId::new(format!("i{}", id)), *q).unwrap();
            }
        }
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_merge(n in 1usize..50) {
            let mut cart = Cart::new();
            for _ in 0..n {
                cart.add_item(entry("same", 250));
            }
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.get_item(&ItemId::new("same")).unwrap().quantity as usize, n);
        }

        #[test]
        fn prop_update_quantity_law(start in 1u32..10, q in -5i64..50) {
            let mut cart = Cart::new();
            for _ in 0..start {
                cart.add_item(entry("x", 100));
            }
            cart.update_quantity(&ItemId::new("x"), q).unwrap();
            match cart.get_item(&ItemId::new("x")) {
                Some(item) => {
                    prop_assert!(q > 0);
                    prop_assert_eq!(i64::from(item.quantity), q);
                }
                None => prop_assert!(q <= 0),
            }
        }

        #[test]
        fn prop_total_is_sum_of_rows(ops in prop::collection::vec(op(), 0..40)) {
            let mut cart = Cart::new();
            for op in &ops {
                apply(&mut cart, op);
            }
            let expected = cart
                .items()
                .iter()
                .fold(Decimal::ZERO, |acc, i| acc + i.unit_price * Decimal::from(i.quantity));
            prop_assert_eq!(cart.total(), expected);
            prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));

            let ids: BTreeSet<_> = cart.items().iter().map(|i| i.id.clone()).collect();
            prop_assert_eq!(ids.len(), cart.len());
        }
    }
}
