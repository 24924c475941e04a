//! # Demo Scenarios
//!
//! Sample callers of the purchase engine. Each scenario builds its own
//! catalog and customers, runs a series of purchase attempts and records
//! what happened; printing is left to [`crate::render`].
//!
//! ```text
//! ┌──────────────────┐    ┌───────────────────┐    ┌──────────────────┐
//! │ grocery() /      │───►│ Scenario { steps }│───►│ render::text /   │
//! │ bookstore()      │    │  Completed | ...  │    │ render::json     │
//! └──────────────────┘    └───────────────────┘    └──────────────────┘
//! ```
//!
//! Every scenario takes `now` so that expiry dates are relative to a fixed
//! instant and the outcome is reproducible.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mercato_core::{
    Cart, Catalog, CheckoutEngine, CheckoutOutcome, CoreResult, Item, Money, Party, Receipt,
    SharedItem, Weight,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppError;

// =============================================================================
// Report Types
// =============================================================================

/// A named sequence of purchase attempts.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub title: String,
    pub steps: Vec<Step>,
}

/// One attempt and its result.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub label: String,
    pub result: StepResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepResult {
    /// Checkout committed.
    Completed(Receipt),
    /// Checkout of an empty cart.
    NothingToDo,
    /// Direct purchase of an unknown id.
    NotFound(String),
    /// Purchase refused by the engine (expected in several scenarios).
    Rejected(AppError),
    /// Catalog entries, one per line.
    Listing(Vec<String>),
}

impl Scenario {
    fn new(title: impl Into<String>) -> Self {
        Scenario {
            title: title.into(),
            steps: Vec::new(),
        }
    }

    /// Runs `attempt` and records its outcome or error.
    fn attempt<F>(&mut self, label: &str, attempt: F)
    where
        F: FnOnce() -> CoreResult<CheckoutOutcome>,
    {
        let result = match attempt() {
            Ok(CheckoutOutcome::Completed(receipt)) => StepResult::Completed(receipt),
            Ok(CheckoutOutcome::NothingToDo) => StepResult::NothingToDo,
            Ok(CheckoutOutcome::ItemNotFound(id)) => StepResult::NotFound(id),
            Err(err) => {
                debug!(step = label, error = %err, "Purchase attempt rejected");
                StepResult::Rejected(err.into())
            }
        };

        self.steps.push(Step {
            label: label.to_string(),
            result,
        });
    }

    fn list(&mut self, label: &str, entries: Vec<String>) {
        self.steps.push(Step {
            label: label.to_string(),
            result: StepResult::Listing(entries),
        });
    }

    /// Number of steps that committed a purchase.
    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step.result, StepResult::Completed(_)))
            .count()
    }
}

/// All demo scenarios in display order.
pub fn all(engine: &CheckoutEngine, now: DateTime<Utc>) -> Result<Vec<Scenario>, AppError> {
    Ok(vec![grocery(engine, now)?, bookstore(engine, now)?])
}

// =============================================================================
// Grocery: perishables, appliances, scratch cards
// =============================================================================

const CHEESE: Weight = Weight::from_grams(400);
const BISCUITS: Weight = Weight::from_grams(700);
const TELEVISION: Weight = Weight::from_grams(5000);

fn cheese(price: i64, stock: i64, expires_at: DateTime<Utc>) -> CoreResult<Item> {
    Ok(Item::perishable("CHEESE-400", "Cheese 400g", Money::from_major(price), stock, expires_at)?
        .with_weight(CHEESE))
}

fn biscuits(price: i64, stock: i64, expires_at: DateTime<Utc>) -> CoreResult<Item> {
    Ok(
        Item::perishable("BISCUITS-700", "Biscuits 700g", Money::from_major(price), stock, expires_at)?
            .with_weight(BISCUITS),
    )
}

fn television(price: i64, stock: i64) -> CoreResult<Item> {
    Ok(Item::stocked("TV", "Television", Money::from_major(price), stock)?.with_weight(TELEVISION))
}

fn scratch_card(price: i64, stock: i64) -> CoreResult<Item> {
    Item::stocked("SCRATCH-CARD", "Scratch Card", Money::from_major(price), stock)
}

/// Six grocery checkouts covering the happy path and each rejection.
pub fn grocery(engine: &CheckoutEngine, now: DateTime<Utc>) -> Result<Scenario, AppError> {
    info!("Running grocery scenario");
    let mut scenario = Scenario::new("Grocery store");

    scenario.attempt("Normal purchase", || {
        let mut customer = Party::new("Youssef", Money::from_major(1000))?
            .with_address("12 Tahrir Square, Cairo");
        let mut cart = Cart::new();

        cart.add_at(&cheese(90, 5, now + Duration::days(10))?.into(), 2, now)?;
        cart.add_at(&biscuits(120, 2, now + Duration::days(15))?.into(), 1, now)?;
        cart.add_at(&television(400, 1)?.into(), 1, now)?;
        cart.add_at(&scratch_card(20, 10)?.into(), 3, now)?;

        engine.checkout_at(&mut cart, &mut customer, now)
    });

    scenario.attempt("Expired product", || {
        let mut customer = Party::new("Youssef", Money::from_major(500))?;
        let mut cart = Cart::new();

        cart.add_at(&cheese(85, 5, now - Duration::days(2))?.into(), 1, now)?;
        engine.checkout_at(&mut cart, &mut customer, now)
    });

    scenario.attempt("Insufficient stock", || {
        let mut customer = Party::new("Ali", Money::from_major(800))?;
        let mut cart = Cart::new();

        cart.add_at(&television(500, 1)?.into(), 2, now)?;
        engine.checkout_at(&mut cart, &mut customer, now)
    });

    scenario.attempt("Insufficient balance", || {
        let mut customer =
            Party::new("Mohammed", Money::from_major(100))?.with_address("5 Nile Corniche, Giza");
        let mut cart = Cart::new();

        cart.add_at(&television(300, 2)?.into(), 1, now)?;
        engine.checkout_at(&mut cart, &mut customer, now)
    });

    scenario.attempt("Empty cart", || {
        let mut customer = Party::new("Saif", Money::from_major(200))?;
        engine.checkout_at(&mut Cart::new(), &mut customer, now)
    });

    scenario.attempt("Add twice and merge", || {
        let mut customer =
            Party::new("Mahmoud", Money::from_major(1000))?.with_address("9 Port Said Street, Alexandria");
        let mut cart = Cart::new();
        let item: SharedItem = biscuits(100, 10, now + Duration::days(20))?.into();

        cart.add_at(&item, 2, now)?;
        cart.add_at(&item, 3, now)?;
        engine.checkout_at(&mut cart, &mut customer, now)
    });

    Ok(scenario)
}

// =============================================================================
// Bookstore: paper, e-book, showcase, purge
// =============================================================================

const PAPER_BOOK: Weight = Weight::from_grams(450);

fn year_start(year: i32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AppError::internal(format!("Invalid year {}", year)))
}

fn describe(item: &Item) -> String {
    match item.release_date() {
        Some(date) => format!("{} ({}) ISBN {}", item.name(), date.format("%Y"), item.id()),
        None => format!("{} ISBN {}", item.name(), item.id()),
    }
}

fn bookstore_catalog() -> Result<Catalog, AppError> {
    let mut catalog = Catalog::new();

    catalog.add(
        Item::stocked("123456", "Example book 1", Money::from_major_minor(29, 99), 15)?
            .with_weight(PAPER_BOOK)
            .released_on(year_start(2001)?),
    );
    catalog.add(
        Item::stocked("987654321", "Example book 2", Money::from_major_minor(19, 99), 3)?
            .with_weight(PAPER_BOOK)
            .released_on(year_start(2025)?),
    );
    catalog.add(
        Item::digital("1111111111", "Example book 3", Money::from_major_minor(24, 99), Some("pdf"))?
            .released_on(year_start(2023)?),
    );
    catalog.add(
        Item::display_only("9999999999", "Example book 4", Money::from_major(5000))?
            .released_on(year_start(1999)?),
    );

    Ok(catalog)
}

/// Direct purchases by id, then a purge of titles released before 2010.
pub fn bookstore(engine: &CheckoutEngine, now: DateTime<Utc>) -> Result<Scenario, AppError> {
    info!("Running bookstore scenario");
    let mut scenario = Scenario::new("Bookstore");
    let mut catalog = bookstore_catalog()?;

    scenario.attempt("Paper book, shipped", || {
        let mut customer = Party::new("Customer 1", Money::from_major(1000))?
            .with_email("customer1@email.com")?
            .with_address("123 Main Street");
        engine.buy_now_at(&catalog, "123456", 2, &mut customer, now)
    });

    scenario.attempt("E-book, e-mailed", || {
        let mut customer =
            Party::new("Customer 2", Money::from_major(100))?.with_email("customer2@gmail.com")?;
        engine.buy_now_at(&catalog, "1111111111", 1, &mut customer, now)
    });

    scenario.attempt("Showcase book", || {
        let mut customer =
            Party::new("Customer 3", Money::from_major(10_000))?.with_email("customer3@email.com")?;
        engine.buy_now_at(&catalog, "9999999999", 1, &mut customer, now)
    });

    scenario.attempt("Unknown ISBN", || {
        let mut customer = Party::new("Customer 4", Money::from_major(500))?
            .with_email("customer4@company.com")?
            .with_address("789 Business Ave");
        engine.buy_now_at(&catalog, "978-0987654321", 5, &mut customer, now)
    });

    let removed = catalog.purge_older_than(year_start(2010)?);
    scenario.list(
        "Removed titles released before 2010",
        removed.iter().map(|item| item.with(describe)).collect(),
    );

    scenario.list(
        "Current inventory",
        catalog.iter().map(|item| item.with(describe)).collect(),
    );

    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn result<'a>(scenario: &'a Scenario, label: &str) -> &'a StepResult {
        &scenario
            .steps
            .iter()
            .find(|step| step.label == label)
            .unwrap()
            .result
    }

    fn rejected_code(result: &StepResult) -> ErrorCode {
        match result {
            StepResult::Rejected(err) => err.code,
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_grocery_normal_purchase_totals() {
        let scenario = grocery(&CheckoutEngine::default(), fixed_now()).unwrap();

        let StepResult::Completed(receipt) = result(&scenario, "Normal purchase") else {
            panic!("normal purchase should complete");
        };
        assert_eq!(receipt.subtotal, Money::from_major(760));
        assert_eq!(receipt.fulfillment, Money::from_major(65));
        assert_eq!(receipt.total, Money::from_major(825));
        assert_eq!(receipt.remaining_balance, Money::from_major(175));
        assert_eq!(receipt.lines.len(), 4);
    }

    #[test]
    fn test_grocery_rejections() {
        let scenario = grocery(&CheckoutEngine::default(), fixed_now()).unwrap();

        assert_eq!(rejected_code(result(&scenario, "Expired product")), ErrorCode::Expired);
        assert_eq!(rejected_code(result(&scenario, "Insufficient stock")), ErrorCode::OutOfStock);
        assert_eq!(
            rejected_code(result(&scenario, "Insufficient balance")),
            ErrorCode::InsufficientFunds
        );
        assert!(matches!(result(&scenario, "Empty cart"), StepResult::NothingToDo));
    }

    #[test]
    fn test_grocery_merge_checks_out_one_line() {
        let scenario = grocery(&CheckoutEngine::default(), fixed_now()).unwrap();

        let StepResult::Completed(receipt) = result(&scenario, "Add twice and merge") else {
            panic!("merge scenario should complete");
        };
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.lines[0].quantity, 5);
        // 5 × 100 + 3.5 kg × 10
        assert_eq!(receipt.total, Money::from_major(535));
        assert_eq!(scenario.completed_count(), 2);
    }

    #[test]
    fn test_bookstore_purchases() {
        let scenario = bookstore(&CheckoutEngine::default(), fixed_now()).unwrap();

        let StepResult::Completed(paper) = result(&scenario, "Paper book, shipped") else {
            panic!("paper book should complete");
        };
        // 2 × 29.99 + 0.9 kg × 10
        assert_eq!(paper.total, Money::from_major_minor(68, 98));

        let StepResult::Completed(ebook) = result(&scenario, "E-book, e-mailed") else {
            panic!("e-book should complete");
        };
        assert_eq!(ebook.fulfillment, Money::zero());

        assert_eq!(rejected_code(result(&scenario, "Showcase book")), ErrorCode::OutOfStock);
        assert!(matches!(
            result(&scenario, "Unknown ISBN"),
            StepResult::NotFound(id) if id == "978-0987654321"
        ));
    }

    #[test]
    fn test_bookstore_purge_listing() {
        let scenario = bookstore(&CheckoutEngine::default(), fixed_now()).unwrap();

        let StepResult::Listing(removed) = result(&scenario, "Removed titles released before 2010")
        else {
            panic!("expected listing");
        };
        assert_eq!(removed.len(), 2);
        assert!(removed[0].contains("Example book 1 (2001)"));
        assert!(removed[1].contains("Example book 4 (1999)"));

        let StepResult::Listing(inventory) = result(&scenario, "Current inventory") else {
            panic!("expected listing");
        };
        assert_eq!(inventory.len(), 2);
    }
}
