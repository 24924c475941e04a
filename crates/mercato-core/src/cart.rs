//! # Cart
//!
//! The customer's selection: ordered `(item, quantity)` lines, merged by
//! item id.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add(item, q)                                                           │
//! │     ├── q <= 0?                    → InvalidQuantity                    │
//! │     ├── item.check_availability(q) → Expired / OutOfStock               │
//! │     ├── already in cart?                                                │
//! │     │      └── available(existing + q)? no → ExceedsAvailability        │
//! │     │                                        (line left unchanged)      │
//! │     ├── charge for the new quantity fits? no → AmountOverflow           │
//! │     └── push / merge                                                    │
//! │                                                                         │
//! │  NOTE: nothing is reserved. Checkout re-validates every line.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::item::SharedItem;
use crate::money::Money;
use crate::types::ItemId;

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLine {
    item: SharedItem,
    quantity: i64,
}

impl CartLine {
    #[inline]
    pub fn item(&self) -> &SharedItem {
        &self.item
    }

    #[inline]
    pub fn item_id(&self) -> &ItemId {
        self.item.id()
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.item.with(|i| i.line_total(self.quantity))
    }

    /// Weight-based shipping for this line.
    pub fn shipping_cost(&self) -> CoreResult<Money> {
        self.item.with(|i| i.shipping_cost(self.quantity))
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by item id (adding the same item again merges)
/// - Every quantity is > 0
/// - Line order is insertion order
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds `quantity` of `item`, checked against the system clock.
    pub fn add(&mut self, item: &SharedItem, quantity: i64) -> CoreResult<()> {
        self.add_at(item, quantity, Utc::now())
    }

    /// Adds `quantity` of `item`, evaluating expiry at `now`.
    ///
    /// When the item is already in the cart, the merged quantity is
    /// validated as a whole; on failure the existing line keeps its
    /// previous quantity.
    pub fn add_at(&mut self, item: &SharedItem, quantity: i64, now: DateTime<Utc>) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                item_id: item.id().to_string(),
                requested: quantity,
            });
        }

        let current = item.lock();
        current.check_availability(quantity, now)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.item.id() == item.id()) {
            let combined = line.quantity.checked_add(quantity).ok_or_else(|| {
                CoreError::AmountOverflow {
                    item_id: Some(item.id().to_string()),
                    what: format!("quantity {} + {} of {}", line.quantity, quantity, item.id()),
                }
            })?;
            if !current.is_available_at(combined, now) {
                return Err(CoreError::ExceedsAvailability {
                    item_id: item.id().to_string(),
                    name: current.name().to_string(),
                    in_cart: line.quantity,
                    requested: quantity,
                });
            }
            current.charge(combined)?;
            line.quantity = combined;
            debug!(item_id = %item.id(), quantity = combined, "Cart line merged");
            return Ok(());
        }

        current.charge(quantity)?;
        drop(current);
        self.lines.push(CartLine {
            item: item.clone(),
            quantity,
        });
        debug!(item_id = %item.id(), quantity, "Cart line added");
        Ok(())
    }

    /// Removes the line for `item_id`.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.item.id().as_str() != item_id);

        if self.lines.len() == initial_len {
            Err(CoreError::NotInCart(item_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Quantity currently held for `item_id`.
    pub fn quantity_of(&self, item_id: &str) -> Option<i64> {
        self.lines
            .iter()
            .find(|l| l.item.id().as_str() == item_id)
            .map(|l| l.quantity)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Σ unit price × quantity.
    pub fn subtotal(&self) -> CoreResult<Money> {
        let amounts = self
            .lines
            .iter()
            .map(CartLine::line_total)
            .collect::<CoreResult<Vec<_>>>()?;
        Money::checked_sum(amounts).ok_or_else(|| CoreError::total_overflow("cart subtotal"))
    }

    /// Σ weight × quantity × rate over weighted items.
    pub fn fulfillment_cost(&self) -> CoreResult<Money> {
        let amounts = self
            .lines
            .iter()
            .map(CartLine::shipping_cost)
            .collect::<CoreResult<Vec<_>>>()?;
        Money::checked_sum(amounts).ok_or_else(|| CoreError::total_overflow("cart fulfillment"))
    }

    /// Subtotal plus fulfillment.
    pub fn total(&self) -> CoreResult<Money> {
        self.subtotal()?
            .checked_add(self.fulfillment_cost()?)
            .ok_or_else(|| CoreError::total_overflow("cart total"))
    }
}

/// Cart totals summary for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub fulfillment: Money,
    pub total: Money,
}

impl TryFrom<&Cart> for CartTotals {
    type Error = CoreError;

    fn try_from(cart: &Cart) -> CoreResult<Self> {
        let subtotal = cart.subtotal()?;
        let fulfillment = cart.fulfillment_cost()?;
        Ok(CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            fulfillment,
            total: subtotal
                .checked_add(fulfillment)
                .ok_or_else(|| CoreError::total_overflow("cart total"))?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
