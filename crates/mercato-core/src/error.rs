//! # Error Types
//!
//! Domain-specific error types for mercato-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercato-core errors (this file)                                       │
//! │  ├── CoreError        - Cart, availability and checkout failures       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Demo app errors                                                        │
//! │  └── AppError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → rendered message       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recoverability
//! Everything except [`CoreError::StockInvariantViolated`] is raised before
//! any state is mutated, so the caller may fix the input and retry.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::money::Money;
use crate::types::FulfillmentField;

// =============================================================================
// Shortfall
// =============================================================================

/// Why an item cannot cover a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// Stock-backed item with fewer units left than requested.
    Remaining(i64),
    /// Display-only item.
    NotForSale,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::Remaining(n) => write!(f, "only {} remaining", n),
            Shortfall::NotForSale => f.write_str("not for sale"),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Cart, availability and checkout errors.
///
/// Every variant names the item (or party) that caused it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity is zero or negative.
    #[error("Quantity for {item_id} must be greater than zero, got {requested}")]
    InvalidQuantity { item_id: String, requested: i64 },

    /// Perishable item past its expiry instant.
    ///
    /// ## When This Occurs
    /// - Adding an expired item to the cart
    /// - Checking out a cart whose item expired after it was added
    #[error("{name} ({item_id}) expired at {expired_at}")]
    Expired {
        item_id: String,
        name: String,
        expired_at: DateTime<Utc>,
    },

    /// Not enough stock, or the item is not for sale at all.
    #[error("{name} ({item_id}) is out of stock: requested {requested}, {shortfall}")]
    OutOfStock {
        item_id: String,
        name: String,
        requested: i64,
        shortfall: Shortfall,
    },

    /// The merged cart quantity would exceed what the item can supply.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart holds 2 × TV (stock 3)
    ///      │
    ///      ▼
    /// add(TV, 2) → combined 4 > 3
    ///      │
    ///      ▼
    /// ExceedsAvailability { in_cart: 2, requested: 2 }   (cart still holds 2)
    /// ```
    #[error("Can't add {requested} more of {name} ({item_id}): {in_cart} already in cart")]
    ExceedsAvailability {
        item_id: String,
        name: String,
        in_cart: i64,
        requested: i64,
    },

    /// Party balance is below the amount due.
    #[error("Insufficient funds for {party}: balance {balance}, required {required}")]
    InsufficientFunds {
        party: String,
        balance: Money,
        required: Money,
    },

    /// A contact detail needed to fulfil the line is absent.
    #[error("{name} ({item_id}) requires a {missing}")]
    MissingFulfillmentInfo {
        item_id: String,
        name: String,
        missing: FulfillmentField,
    },

    /// A line total, shipping charge or cart total does not fit in [`Money`].
    ///
    /// Raised by `Cart::add` and by checkout Phase 1, before anything is
    /// debited or deducted.
    #[error("Amount too large: {what}")]
    AmountOverflow {
        item_id: Option<String>,
        what: String,
    },

    /// Catalog lookup miss.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// No cart line for this id.
    #[error("Item {0} is not in the cart")]
    NotInCart(String),

    /// Stock deduction failed after the party was debited.
    ///
    /// Phase 1 validation runs under the item locks, so this means an
    /// internal invariant is broken. Never retried, never swallowed.
    #[error("Stock invariant violated for {item_id}: deducting {requested} from {available}")]
    StockInvariantViolated {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Overflow of an amount that belongs to no single item.
    pub(crate) fn total_overflow(what: &str) -> Self {
        CoreError::AmountOverflow {
            item_id: None,
            what: what.to_string(),
        }
    }

    /// False only for errors raised after state was already mutated.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::StockInvariantViolated { .. })
    }

    /// The item id this error refers to, if any.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            CoreError::InvalidQuantity { item_id, .. }
            | CoreError::Expired { item_id, .. }
            | CoreError::OutOfStock { item_id, .. }
            | CoreError::ExceedsAvailability { item_id, .. }
            | CoreError::MissingFulfillmentInfo { item_id, .. }
            | CoreError::StockInvariantViolated { item_id, .. } => Some(item_id),
            CoreError::ItemNotFound(id) | CoreError::NotInCart(id) => Some(id),
            CoreError::AmountOverflow { item_id, .. } => item_id.as_deref(),
            CoreError::InsufficientFunds { .. } | CoreError::Validation(_) => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised while building items and parties.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. malformed e-mail).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_stock_message() {
        let err = CoreError::OutOfStock {
            item_id: "TV-01".to_string(),
            name: "Television".to_string(),
            requested: 2,
            shortfall: Shortfall::Remaining(1),
        };
        assert_eq!(
            err.to_string(),
            "Television (TV-01) is out of stock: requested 2, only 1 remaining"
        );
    }

    #[test]
    fn test_not_for_sale_message() {
        let err = CoreError::OutOfStock {
            item_id: "9999999999".to_string(),
            name: "Showcase".to_string(),
            requested: 1,
            shortfall: Shortfall::NotForSale,
        };
        assert!(err.to_string().ends_with("not for sale"));
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = CoreError::InsufficientFunds {
            party: "Mohammed".to_string(),
            balance: Money::from_major(100),
            required: Money::from_major(350),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds for Mohammed: balance 100.00, required 350.00"
        );
    }

    #[test]
    fn test_missing_fulfillment_message() {
        let err = CoreError::MissingFulfillmentInfo {
            item_id: "123456".to_string(),
            name: "Paper book".to_string(),
            missing: FulfillmentField::ShippingAddress,
        };
        assert_eq!(err.to_string(), "Paper book (123456) requires a shipping address");
    }

    #[test]
    fn test_recoverability() {
        let fatal = CoreError::StockInvariantViolated {
            item_id: "X".to_string(),
            available: 0,
            requested: 1,
        };
        assert!(!fatal.is_recoverable());
        assert!(CoreError::ItemNotFound("X".to_string()).is_recoverable());
        assert!(CoreError::total_overflow("cart total").is_recoverable());
    }

    #[test]
    fn test_amount_overflow_item_id() {
        let err = CoreError::AmountOverflow {
            item_id: Some("EBOOK".to_string()),
            what: "line total for 9223372036854775 × EBOOK".to_string(),
        };
        assert_eq!(err.item_id(), Some("EBOOK"));
        assert!(err.to_string().starts_with("Amount too large: line total"));
        assert_eq!(CoreError::total_overflow("cart total").item_id(), None);
    }

    #[test]
    fn test_item_id_accessor() {
        let err = CoreError::InvalidQuantity {
            item_id: "CHEESE".to_string(),
            requested: 0,
        };
        assert_eq!(err.item_id(), Some("CHEESE"));

        let err = CoreError::InsufficientFunds {
            party: "Ali".to_string(),
            balance: Money::zero(),
            required: Money::from_major(1),
        };
        assert_eq!(err.item_id(), None);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
