//! # Validation Module
//!
//! Input validation for catalog population and party setup.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Construction (THIS MODULE)                                   │
//! │  ├── Item id / name present, price and stock not negative              │
//! │  └── Party balance not negative, e-mail well formed                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart.add                                                     │
//! │  └── Quantity positive, item available for the (merged) quantity       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout Phase 1                                             │
//! │  └── Re-check every line under the item locks, contact details         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mercato_core::validation::{validate_item_id, validate_price_cents};
//!
//! validate_item_id("978-0987654321").unwrap();
//! assert!(validate_price_cents(-1).is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item id.
pub const MAX_ITEM_ID_LEN: usize = 64;

/// Longest accepted display name.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item identifier.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 64 characters
/// - No interior whitespace
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_ITEM_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ITEM_ID_LEN,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (items and parties).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an e-mail address.
///
/// Deliberately shallow: one `@` with text on both sides and a dot in the
/// domain part.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let email = email.trim();
    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("expected exactly one '@' between local part and domain"));
    }

    if !domain.contains('.') {
        return Err(invalid("domain must contain a '.'"));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in minor units. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use mercato_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2999).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    non_negative("price", cents)
}

/// Validates an initial stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    non_negative("stock", stock)
}

/// Validates an opening balance in minor units.
pub fn validate_balance_cents(cents: i64) -> ValidationResult<()> {
    non_negative("balance", cents)
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
