//! # Checkout Engine
//!
//! Turns a cart into a committed purchase, or into an error with nothing
//! changed.
//!
//! ## Two-Phase Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       checkout(cart, party)                             │
//! │                                                                         │
//! │  cart empty? ───────────────────────────────► NothingToDo (no debit)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Lock every line's item, sorted by item id                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PHASE 1 (read-only), per line in cart order                            │
//! │  ├── expired?                         → Expired                         │
//! │  ├── available for quantity?          → OutOfStock                      │
//! │  ├── address / e-mail present?        → MissingFulfillmentInfo          │
//! │  └── line and cart totals fit?        → AmountOverflow                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PHASE 2                                                                │
//! │  ├── total = subtotal + fulfillment                                     │
//! │  ├── party.debit(total)               → InsufficientFunds (no stock     │
//! │  │                                      touched yet)                    │
//! │  ├── deduct stock, cart order         → StockInvariantViolated (fatal)  │
//! │  ├── fulfillment hooks, cart order                                      │
//! │  └── release locks, clear cart        → Completed(Receipt)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Holding all item locks across both phases makes a checkout atomic with
//! respect to any other checkout touching the same items. Sorting the
//! acquisition by id rules out lock-order deadlocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::MutexGuard;
use tracing::{debug, error, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::fulfillment::{DeliveryNotifier, LogNotifier, LogShipping, ShippingService};
use crate::item::Item;
use crate::money::Money;
use crate::party::Party;
use crate::types::{FulfillmentField, ItemKind};

// =============================================================================
// Receipt
// =============================================================================

/// One purchased line, frozen at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    pub shipping: Money,
    pub fulfillment: ItemKind,
}

/// Structured result of a committed checkout, handed to the presentation
/// layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_id: String,
    pub customer: String,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: Money,
    pub fulfillment: Money,
    pub total: Money,
    pub remaining_balance: Money,
}

/// What a checkout call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Purchase committed.
    Completed(Receipt),
    /// The cart was empty; nothing was debited.
    NothingToDo,
    /// Direct purchase of an id the catalog does not have.
    ItemNotFound(String),
}

impl CheckoutOutcome {
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            CheckoutOutcome::Completed(receipt) => Some(receipt),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CheckoutOutcome::Completed(_))
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Runs checkouts and dispatches fulfillment hooks.
pub struct CheckoutEngine {
    shipping: Box<dyn ShippingService>,
    notifier: Box<dyn DeliveryNotifier>,
}

impl Default for CheckoutEngine {
    /// Engine whose hooks only emit log events.
    fn default() -> Self {
        CheckoutEngine::new(LogShipping, LogNotifier)
    }
}

impl std::fmt::Debug for CheckoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutEngine").finish_non_exhaustive()
    }
}

impl CheckoutEngine {
    pub fn new(
        shipping: impl ShippingService + 'static,
        notifier: impl DeliveryNotifier + 'static,
    ) -> Self {
        CheckoutEngine {
            shipping: Box::new(shipping),
            notifier: Box::new(notifier),
        }
    }

    /// Checks out `cart` for `party` against the system clock.
    pub fn checkout(&self, cart: &mut Cart, party: &mut Party) -> CoreResult<CheckoutOutcome> {
        self.checkout_at(cart, party, Utc::now())
    }

    /// Checks out `cart` for `party`, evaluating expiry at `now`.
    ///
    /// On `Err` (other than the fatal invariant violation) the cart, the
    /// party balance and every item's stock are exactly as before the call.
    pub fn checkout_at(
        &self,
        cart: &mut Cart,
        party: &mut Party,
        now: DateTime<Utc>,
    ) -> CoreResult<CheckoutOutcome> {
        if cart.is_empty() {
            info!(customer = party.name(), "Cart is empty, nothing to check out");
            return Ok(CheckoutOutcome::NothingToDo);
        }

        let receipt = self.commit(cart.lines(), party, now)?;
        cart.clear();

        info!(
            receipt_id = %receipt.receipt_id,
            customer = %receipt.customer,
            lines = receipt.lines.len(),
            total = %receipt.total,
            remaining_balance = %receipt.remaining_balance,
            "Checkout completed"
        );

        Ok(CheckoutOutcome::Completed(receipt))
    }

    /// Looks up `item_id` and purchases `quantity` of it immediately.
    pub fn buy_now(
        &self,
        catalog: &Catalog,
        item_id: &str,
        quantity: i64,
        party: &mut Party,
    ) -> CoreResult<CheckoutOutcome> {
        self.buy_now_at(catalog, item_id, quantity, party, Utc::now())
    }

    /// [`CheckoutEngine::buy_now`] evaluated at `now`.
    ///
    /// A missing id is reported as [`CheckoutOutcome::ItemNotFound`], not as
    /// an error, so callers can branch on it.
    pub fn buy_now_at(
        &self,
        catalog: &Catalog,
        item_id: &str,
        quantity: i64,
        party: &mut Party,
        now: DateTime<Utc>,
    ) -> CoreResult<CheckoutOutcome> {
        let Some(item) = catalog.find_by_id(item_id) else {
            warn!(item_id, "Direct purchase of unknown item");
            return Ok(CheckoutOutcome::ItemNotFound(item_id.to_string()));
        };

        let mut cart = Cart::new();
        cart.add_at(&item, quantity, now)?;
        self.checkout_at(&mut cart, party, now)
    }

    fn commit(&self, lines: &[CartLine], party: &mut Party, now: DateTime<Utc>) -> CoreResult<Receipt> {
        let mut items = lock_in_id_order(lines);

        // ---------------------------------------------------------------------
        // Phase 1: validate and price, no mutation
        // ---------------------------------------------------------------------
        let mut priced = Vec::with_capacity(lines.len());
        for (line, item) in lines.iter().zip(items.iter()) {
            let quantity = line.quantity();
            item.check_availability(quantity, now)
                .inspect_err(|e| warn!(item_id = %line.item_id(), error = %e, "Checkout validation failed"))?;
            check_contact(item, party)?;

            let line_total = item.line_total(quantity)?;
            let shipping = item.shipping_cost(quantity)?;
            priced.push((line_total, shipping));
        }

        let subtotal = Money::checked_sum(priced.iter().map(|(line_total, _)| *line_total))
            .ok_or_else(|| CoreError::total_overflow("checkout subtotal"))?;
        let fulfillment = Money::checked_sum(priced.iter().map(|(_, shipping)| *shipping))
            .ok_or_else(|| CoreError::total_overflow("checkout fulfillment"))?;
        let total = subtotal
            .checked_add(fulfillment)
            .ok_or_else(|| CoreError::total_overflow("checkout total"))
            .inspect_err(|e| warn!(error = %e, "Checkout total out of range"))?;

        debug!(%subtotal, %fulfillment, %total, "Checkout validated");

        // ---------------------------------------------------------------------
        // Phase 2: commit
        // ---------------------------------------------------------------------
        party
            .debit(total)
            .inspect_err(|e| warn!(customer = party.name(), error = %e, "Checkout debit refused"))?;

        let mut receipt_lines = Vec::with_capacity(lines.len());
        for ((line, item), (line_total, shipping)) in lines.iter().zip(items.iter_mut()).zip(priced) {
            let quantity = line.quantity();
            let available = item.remaining_stock().unwrap_or(0);

            item.deduct_stock(quantity).map_err(|e| {
                error!(
                    item_id = %line.item_id(),
                    available,
                    requested = quantity,
                    error = %e,
                    "Stock deduction failed after debit"
                );
                CoreError::StockInvariantViolated {
                    item_id: line.item_id().to_string(),
                    available,
                    requested: quantity,
                }
            })?;

            receipt_lines.push(ReceiptLine {
                item_id: item.id().to_string(),
                name: item.name().to_string(),
                quantity,
                unit_price: item.unit_price(),
                line_total,
                shipping,
                fulfillment: item.kind(),
            });
        }

        for (line, item) in lines.iter().zip(items.iter()) {
            self.fulfil(item, line.quantity(), party);
        }

        Ok(Receipt {
            receipt_id: Uuid::new_v4().to_string(),
            customer: party.name().to_string(),
            completed_at: now,
            lines: receipt_lines,
            subtotal,
            fulfillment,
            total,
            remaining_balance: party.balance(),
        })
    }

    fn fulfil(&self, item: &Item, quantity: i64, party: &Party) {
        let contact = party.contact();
        match item.kind() {
            ItemKind::Shippable => {
                if let Some(address) = contact.shipping_address() {
                    self.shipping.ship(item, quantity, address);
                }
            }
            ItemKind::Digital => {
                if let Some(email) = contact.email_address() {
                    self.notifier.notify(item, email);
                }
            }
            ItemKind::CarryOut | ItemKind::DisplayOnly => {}
        }
    }
}

/// Locks every line's item in ascending id order and returns the guards in
/// line order.
fn lock_in_id_order(lines: &[CartLine]) -> Vec<MutexGuard<'_, Item>> {
    let mut order: Vec<usize> = (0..lines.len()).collect();
    order.sort_by(|&a, &b| lines[a].item_id().cmp(lines[b].item_id()));

    let mut locked: Vec<(usize, MutexGuard<'_, Item>)> = order
        .into_iter()
        .map(|idx| (idx, lines[idx].item().lock()))
        .collect();
    locked.sort_by_key(|(idx, _)| *idx);

    locked.into_iter().map(|(_, guard)| guard).collect()
}

fn check_contact(item: &Item, party: &Party) -> CoreResult<()> {
    let kind = item.kind();
    let contact = party.contact();

    let missing = if kind.requires_address() && contact.shipping_address().is_none() {
        Some(FulfillmentField::ShippingAddress)
    } else if kind.requires_email() && contact.email_address().is_none() {
        Some(FulfillmentField::Email)
    } else {
        None
    };

    match missing {
        Some(missing) => {
            warn!(item_id = %item.id(), %missing, "Checkout missing fulfillment info");
            Err(CoreError::MissingFulfillmentInfo {
                item_id: item.id().to_string(),
                name: item.name().to_string(),
                missing,
            })
        }
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
