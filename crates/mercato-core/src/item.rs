//! # Items
//!
//! Sellable catalog entries and their availability policies.
//!
//! ## Policy Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Availability        is_available(q)                   deduct_stock(q) │
//! │  ─────────────────   ──────────────────────────────    ─────────────── │
//! │  Perishable          now <= expires_at && q <= stock   stock -= q      │
//! │  Stocked             q <= stock                        stock -= q      │
//! │  Unlimited           q > 0                             no-op           │
//! │  DisplayOnly         never                             no-op           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every item is shared between the catalog and any cart holding it through
//! a [`SharedItem`] handle. Stock only changes inside a committing checkout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{CoreError, CoreResult, Shortfall};
use crate::money::Money;
use crate::types::{ItemId, ItemKind, Weight};
use crate::validation;
use crate::SHIPPING_RATE_PER_KG;

// =============================================================================
// Availability Policy
// =============================================================================

/// How an item decides whether a quantity may be sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Availability {
    /// Finite stock that also expires.
    Perishable {
        stock: i64,
        expires_at: DateTime<Utc>,
    },
    /// Finite stock, no expiry.
    Stocked { stock: i64 },
    /// Always available (digital goods). `format` is e.g. "pdf".
    Unlimited { format: Option<String> },
    /// Shown but never sold.
    DisplayOnly,
}

impl Availability {
    /// Remaining units for stock-backed policies.
    pub fn stock(&self) -> Option<i64> {
        match self {
            Availability::Perishable { stock, .. } | Availability::Stocked { stock } => {
                Some(*stock)
            }
            Availability::Unlimited { .. } | Availability::DisplayOnly => None,
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// A sellable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    unit_price: Money,
    weight: Option<Weight>,
    release_date: Option<NaiveDate>,
    availability: Availability,
}

impl Item {
    /// Builds an item after validating id, name, price and stock.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        availability: Availability,
    ) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();

        validation::validate_item_id(id.as_str())?;
        validation::validate_name("name", &name)?;
        validation::validate_price_cents(unit_price.cents())?;
        if let Some(stock) = availability.stock() {
            validation::validate_stock(stock)?;
        }

        Ok(Item {
            id,
            name,
            unit_price,
            weight: None,
            release_date: None,
            availability,
        })
    }

    /// Stock-backed item that expires at `expires_at`.
    pub fn perishable(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        stock: i64,
        expires_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        Item::new(id, name, unit_price, Availability::Perishable { stock, expires_at })
    }

    /// Stock-backed item without expiry.
    pub fn stocked(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        stock: i64,
    ) -> CoreResult<Self> {
        Item::new(id, name, unit_price, Availability::Stocked { stock })
    }

    /// Unlimited item delivered by e-mail.
    pub fn digital(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        format: Option<&str>,
    ) -> CoreResult<Self> {
        let format = format.map(str::to_string);
        Item::new(id, name, unit_price, Availability::Unlimited { format })
    }

    /// Item that is listed but never sold.
    pub fn display_only(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
    ) -> CoreResult<Self> {
        Item::new(id, name, unit_price, Availability::DisplayOnly)
    }

    /// Sets the per-unit physical weight.
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the release date used by [`crate::Catalog::purge_older_than`].
    pub fn released_on(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[inline]
    pub fn weight(&self) -> Option<Weight> {
        self.weight
    }

    #[inline]
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
    }

    #[inline]
    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Remaining units; `None` for items without stock.
    #[inline]
    pub fn remaining_stock(&self) -> Option<i64> {
        self.availability.stock()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.availability {
            Availability::Perishable { expires_at, .. } => Some(*expires_at),
            _ => None,
        }
    }

    /// File format of a digital item.
    pub fn format(&self) -> Option<&str> {
        match &self.availability {
            Availability::Unlimited { format } => format.as_deref(),
            _ => None,
        }
    }

    /// Fulfillment discriminator.
    pub fn kind(&self) -> ItemKind {
        match (&self.availability, self.weight) {
            (Availability::DisplayOnly, _) => ItemKind::DisplayOnly,
            (Availability::Unlimited { .. }, _) => ItemKind::Digital,
            (_, Some(_)) => ItemKind::Shippable,
            (_, None) => ItemKind::CarryOut,
        }
    }

    // -------------------------------------------------------------------------
    // Availability
    // -------------------------------------------------------------------------

    /// True once `now` is strictly past the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| now > expires_at)
    }

    /// Whether `qty` units may be sold at `now`. Pure.
    pub fn is_available_at(&self, qty: i64, now: DateTime<Utc>) -> bool {
        self.check_availability(qty, now).is_ok()
    }

    /// [`Item::is_available_at`] against the system clock.
    pub fn is_available(&self, qty: i64) -> bool {
        self.is_available_at(qty, Utc::now())
    }

    /// Availability with the reason for refusal.
    ///
    /// Expiry wins over stock, so an expired perishable always reports
    /// [`CoreError::Expired`] even when its stock is also short.
    pub fn check_availability(&self, qty: i64, now: DateTime<Utc>) -> CoreResult<()> {
        if qty <= 0 {
            return Err(CoreError::InvalidQuantity {
                item_id: self.id.to_string(),
                requested: qty,
            });
        }

        match &self.availability {
            Availability::Perishable { expires_at, .. } if now > *expires_at => {
                Err(CoreError::Expired {
                    item_id: self.id.to_string(),
                    name: self.name.clone(),
                    expired_at: *expires_at,
                })
            }
            Availability::Perishable { stock, .. } | Availability::Stocked { stock } => {
                if qty <= *stock {
                    Ok(())
                } else {
                    Err(self.out_of_stock(qty, Shortfall::Remaining(*stock)))
                }
            }
            Availability::Unlimited { .. } => Ok(()),
            Availability::DisplayOnly => Err(self.out_of_stock(qty, Shortfall::NotForSale)),
        }
    }

    /// Removes `qty` units from stock. No-op for items without stock.
    ///
    /// Callers must have checked availability first; the checkout engine
    /// treats a failure here as an invariant violation.
    pub fn deduct_stock(&mut self, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            return Err(CoreError::InvalidQuantity {
                item_id: self.id.to_string(),
                requested: qty,
            });
        }

        let remaining = match &mut self.availability {
            Availability::Perishable { stock, .. } | Availability::Stocked { stock } => stock,
            Availability::Unlimited { .. } | Availability::DisplayOnly => return Ok(()),
        };

        if qty > *remaining {
            let available = *remaining;
            return Err(self.out_of_stock(qty, Shortfall::Remaining(available)));
        }

        *remaining -= qty;
        Ok(())
    }

    fn out_of_stock(&self, requested: i64, shortfall: Shortfall) -> CoreError {
        CoreError::OutOfStock {
            item_id: self.id.to_string(),
            name: self.name.clone(),
            requested,
            shortfall,
        }
    }

    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    /// `unit_price × qty`.
    pub fn line_total(&self, qty: i64) -> CoreResult<Money> {
        self.unit_price
            .multiply_quantity(qty)
            .ok_or_else(|| self.amount_overflow("line total", qty))
    }

    /// Fulfillment surcharge for `qty` units; zero for weightless items.
    pub fn shipping_cost(&self, qty: i64) -> CoreResult<Money> {
        match self.weight {
            Some(weight) => weight
                .shipping_cost(qty, SHIPPING_RATE_PER_KG)
                .ok_or_else(|| self.amount_overflow("shipping cost", qty)),
            None => Ok(Money::zero()),
        }
    }

    /// Line total plus shipping for `qty` units.
    ///
    /// Fails with [`CoreError::AmountOverflow`] when any part of the charge
    /// does not fit in [`Money`].
    pub fn charge(&self, qty: i64) -> CoreResult<Money> {
        self.line_total(qty)?
            .checked_add(self.shipping_cost(qty)?)
            .ok_or_else(|| self.amount_overflow("charge", qty))
    }

    fn amount_overflow(&self, what: &str, qty: i64) -> CoreError {
        CoreError::AmountOverflow {
            item_id: Some(self.id.to_string()),
            what: format!("{} for {} × {}", what, qty, self.id),
        }
    }
}

// =============================================================================
// Shared Item Handle
// =============================================================================

/// Shared, lockable handle to a catalog item.
///
/// The catalog and every cart line hold clones of the same handle, so a
/// purge from the catalog leaves carts untouched and a committed checkout is
/// visible through the catalog. The id is cached outside the lock because it
/// never changes; checkout uses it to order lock acquisition.
#[derive(Debug, Clone)]
pub struct SharedItem {
    id: ItemId,
    inner: Arc<Mutex<Item>>,
}

impl SharedItem {
    pub fn new(item: Item) -> Self {
        SharedItem {
            id: item.id().clone(),
            inner: Arc::new(Mutex::new(item)),
        }
    }

    #[inline]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Executes a function with read access to the item.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Item) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the item.
    ///
    /// Intended for catalog maintenance (restocking); checkout takes its own
    /// locks.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Item) -> R,
    {
        f(&mut self.lock())
    }

    /// Clone of the current item state.
    pub fn snapshot(&self) -> Item {
        self.lock().clone()
    }

    /// True when both handles point at the same item.
    pub fn ptr_eq(&self, other: &SharedItem) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Item mutations happen only after every fallible check, so a guard
    /// left by a panicking thread still holds consistent state.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Item> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Item> for SharedItem {
    fn from(item: Item) -> Self {
        SharedItem::new(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
