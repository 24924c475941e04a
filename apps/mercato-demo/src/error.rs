//! # App Error Type
//!
//! What the presentation layer sees when a purchase fails: a
//! machine-readable `code` plus a human-readable `message`.
//!
//! ```json
//! {
//!   "code": "OUT_OF_STOCK",
//!   "message": "Television (TV) is out of stock: requested 2, only 1 remaining"
//! }
//! ```

use mercato_core::CoreError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Item the failure refers to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InvalidQuantity,
    Expired,
    OutOfStock,
    CartError,
    InsufficientFunds,
    MissingFulfillmentInfo,
    AmountTooLarge,
    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
            item_id: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            CoreError::Expired { .. } => ErrorCode::Expired,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::ExceedsAvailability { .. } | CoreError::NotInCart(_) => ErrorCode::CartError,
            CoreError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            CoreError::MissingFulfillmentInfo { .. } => ErrorCode::MissingFulfillmentInfo,
            CoreError::AmountOverflow { .. } => ErrorCode::AmountTooLarge,
            CoreError::ItemNotFound(_) => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::StockInvariantViolated { .. } => {
                // Log the actual error but keep the message generic
                tracing::error!(error = %err, "Purchase engine invariant violated");
                return AppError {
                    item_id: err.item_id().map(str::to_string),
                    ..AppError::internal("Internal error while committing the purchase")
                };
            }
        };

        AppError {
            code,
            message: err.to_string(),
            item_id: err.item_id().map(str::to_string),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Failed to serialize receipt: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use mercato_core::{Money, Shortfall};

    #[test]
    fn test_out_of_stock_maps_with_item() {
        let err: AppError = CoreError::OutOfStock {
            item_id: "TV".to_string(),
            name: "Television".to_string(),
            requested: 2,
            shortfall: Shortfall::Remaining(1),
        }
        .into();

        assert_eq!(err.code, ErrorCode::OutOfStock);
        assert_eq!(err.item_id.as_deref(), Some("TV"));
        assert!(err.message.contains("only 1 remaining"));
    }

    #[test]
    fn test_insufficient_funds_has_no_item() {
        let err: AppError = CoreError::InsufficientFunds {
            party: "Mohammed".to_string(),
            balance: Money::from_major(100),
            required: Money::from_major(350),
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientFunds);
        assert_eq!(err.item_id, None);
    }

    #[test]
    fn test_amount_overflow_maps_to_amount_too_large() {
        let err: AppError = CoreError::AmountOverflow {
            item_id: Some("EBOOK".to_string()),
            what: "line total for 9223372036854775 × EBOOK".to_string(),
        }
        .into();

        assert_eq!(err.code, ErrorCode::AmountTooLarge);
        assert_eq!(err.item_id.as_deref(), Some("EBOOK"));
        assert_eq!(serde_json::to_value(&err).unwrap()["code"], "AMOUNT_TOO_LARGE");
    }

    #[test]
    fn test_invariant_violation_message_is_generic() {
        let err: AppError = CoreError::StockInvariantViolated {
            item_id: "TV".to_string(),
            available: 0,
            requested: 1,
        }
        .into();

        assert_eq!(err.code, ErrorCode::Internal);
        assert!(!err.message.contains("deducting"));
        assert_eq!(err.item_id.as_deref(), Some("TV"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::new(ErrorCode::MissingFulfillmentInfo, "needs an address");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "MISSING_FULFILLMENT_INFO");
        assert_eq!(json["message"], "needs an address");
        assert!(json.get("itemId").is_none());
    }
}
