//! # mercato-core: Item Availability and Purchase Engine
//!
//! The business rules of a small retail workflow, as pure logic with zero
//! I/O dependencies: when an item may be sold, how cart quantities merge,
//! how totals are derived, and how a checkout either fully commits or
//! fully fails.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation (apps/mercato-demo)                   │   │
//! │  │    demo catalog ──► scenarios ──► receipt rendering             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ mercato-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  item    │  │ catalog  │  │   cart   │  │   checkout   │   │   │
//! │  │   │ policies │  │  lookup  │  │  merge   │  │  two-phase   │   │   │
//! │  │   │  stock   │  │  purge   │  │  totals  │  │  commit      │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────┬───────┘   │   │
//! │  │                                                    │           │   │
//! │  │   NO I/O • NO PRINTING • HOOKS ARE TRAITS          ▼           │   │
//! │  │                                          fulfillment hooks     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Item ids, weights, fulfillment kinds
//! - [`item`] - Items, availability policies, shared handles
//! - [`catalog`] - Lookup and date-based purge
//! - [`party`] - Customers and their balance
//! - [`cart`] - Merge-on-add selection and totals
//! - [`checkout`] - The two-phase purchase engine and receipts
//! - [`fulfillment`] - Shipping and delivery hooks
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use mercato_core::{Cart, Catalog, CheckoutEngine, Item, Money, Party, Weight};
//!
//! let mut catalog = Catalog::new();
//! let tv = catalog.add(
//!     Item::stocked("TV-55", "Television", Money::from_major(400), 3)?
//!         .with_weight(Weight::from_grams(5000)),
//! );
//!
//! let mut party = Party::new("Youssef", Money::from_major(1000))?
//!     .with_address("123 Main Street");
//!
//! let mut cart = Cart::new();
//! cart.add(&tv, 1)?;
//!
//! let outcome = CheckoutEngine::default().checkout(&mut cart, &mut party)?;
//! let receipt = outcome.receipt().expect("non-empty cart");
//!
//! // 400.00 + 5 kg × 10.00/kg shipping
//! assert_eq!(receipt.total, Money::from_major(450));
//! assert_eq!(party.balance(), Money::from_major(550));
//! # Ok::<(), mercato_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod fulfillment;
pub mod item;
pub mod money;
pub mod party;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::Catalog;
pub use checkout::{CheckoutEngine, CheckoutOutcome, Receipt, ReceiptLine};
pub use error::{CoreError, CoreResult, Shortfall, ValidationError};
pub use fulfillment::{DeliveryNotifier, LogNotifier, LogShipping, ShippingService};
pub use item::{Availability, Item, SharedItem};
pub use money::Money;
pub use party::{ContactInfo, Party};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shipping surcharge per kilogram of physical weight (10.00 per kg).
///
/// Fixed for now; a per-store setting once stores can configure carriers.
pub const SHIPPING_RATE_PER_KG: Money = Money::from_major(10);
