//! # Domain Types
//!
//! Small value types shared by items, the cart and the checkout engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    ItemId       │   │     Weight      │   │    ItemKind     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  business key   │   │  grams (u32)    │   │  Shippable      │       │
//! │  │  (ISBN, SKU)    │   │  400 = 0.4 kg   │   │  Digital        │       │
//! │  └─────────────────┘   └─────────────────┘   │  CarryOut       │       │
//! │                                              │  DisplayOnly    │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Item Identifier
// =============================================================================

/// Business identifier of a catalog item (ISBN, SKU, ...).
///
/// Immutable once the item is built; the cart merges lines by this key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId(id)
    }
}

// =============================================================================
// Weight
// =============================================================================

/// Physical weight of one unit, in grams.
///
/// Integer grams keep the shipping math exact, the same way `Money` keeps
/// prices in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Weight(u32);

impl Weight {
    #[inline]
    pub const fn from_grams(grams: u32) -> Self {
        Weight(grams)
    }

    #[inline]
    pub const fn grams(&self) -> u32 {
        self.0
    }

    /// Shipping cost for `qty` units at `rate_per_kg`.
    ///
    /// Rounded half-up to the nearest minor unit:
    /// `(grams × qty × rate + 500) / 1000`. `None` when the cost does not
    /// fit in [`Money`].
    ///
    /// ## Example
    /// ```rust
    /// use mercato_core::{Money, Weight};
    ///
    /// let cheese = Weight::from_grams(400);
    /// let cost = cheese.shipping_cost(2, Money::from_major(10));
    /// assert_eq!(cost, Some(Money::from_major(8))); // 0.8 kg × 10/kg
    /// ```
    pub fn shipping_cost(&self, qty: i64, rate_per_kg: Money) -> Option<Money> {
        let milli_cents = i128::from(self.0)
            .checked_mul(i128::from(qty))?
            .checked_mul(i128::from(rate_per_kg.cents()))?
            .checked_add(500)?;
        i64::try_from(milli_cents / 1000).ok().map(Money::from_cents)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g", self.0)
    }
}

// =============================================================================
// Item Kind
// =============================================================================

/// Fulfillment discriminator, derived from an item's availability policy
/// and weight.
///
/// The checkout engine dispatches on this instead of inspecting variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Stock-backed with a physical weight: shipped to the customer's address.
    Shippable,
    /// Unlimited availability: delivered by e-mail.
    Digital,
    /// Stock-backed without weight (scratch cards, vouchers): no fulfillment step.
    CarryOut,
    /// Never sellable.
    DisplayOnly,
}

impl ItemKind {
    /// Whether a purchase of this kind needs a shipping address.
    #[inline]
    pub const fn requires_address(&self) -> bool {
        matches!(self, ItemKind::Shippable)
    }

    /// Whether a purchase of this kind needs an e-mail address.
    #[inline]
    pub const fn requires_email(&self) -> bool {
        matches!(self, ItemKind::Digital)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::Shippable => "shippable",
            ItemKind::Digital => "digital",
            ItemKind::CarryOut => "carry-out",
            ItemKind::DisplayOnly => "display-only",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Fulfillment Field
// =============================================================================

/// Contact detail a fulfillment step depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentField {
    ShippingAddress,
    Email,
}

impl fmt::Display for FulfillmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillmentField::ShippingAddress => f.write_str("shipping address"),
            FulfillmentField::Email => f.write_str("e-mail address"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_cost_exact() {
        let rate = Money::from_major(10);
        assert_eq!(Weight::from_grams(400).shipping_cost(2, rate), Some(Money::from_cents(800)));
        assert_eq!(Weight::from_grams(700).shipping_cost(1, rate), Some(Money::from_cents(700)));
        assert_eq!(Weight::from_grams(5000).shipping_cost(1, rate), Some(Money::from_cents(5000)));
    }

    #[test]
    fn test_shipping_cost_out_of_range() {
        let rate = Money::from_major(10);
        assert_eq!(Weight::from_grams(5000).shipping_cost(i64::MAX, rate), None);
        assert_eq!(
            Weight::from_grams(u32::MAX).shipping_cost(i64::MAX, Money::from_cents(i64::MAX)),
            None
        );
    }

    #[test]
    fn test_shipping_cost_rounds_half_up() {
        // 1 g at 10.05/kg = 1.005 minor units -> 1
        assert_eq!(
            Weight::from_grams(1).shipping_cost(1, Money::from_cents(1005)),
            Some(Money::from_cents(1))
        );
        // 3 g at 0.50/kg = 0.15 minor units -> 0
        assert_eq!(
            Weight::from_grams(3).shipping_cost(1, Money::from_cents(50)),
            Some(Money::zero())
        );
    }

    #[test]
    fn test_item_kind_requirements() {
        assert!(ItemKind::Shippable.requires_address());
        assert!(!ItemKind::Shippable.requires_email());
        assert!(ItemKind::Digital.requires_email());
        assert!(!ItemKind::CarryOut.requires_address());
        assert!(!ItemKind::DisplayOnly.requires_email());
    }

    #[test]
    fn test_item_id_display_and_order() {
        let a = ItemId::from("123456");
        let b = ItemId::from("987654321");
        assert_eq!(a.to_string(), "123456");
        assert!(a < b);
    }
}
