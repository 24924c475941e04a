//! # Receipt Rendering
//!
//! Turns scenario reports into console output. Amounts go through
//! [`AppConfig::format_currency`] so the currency code and decimals follow
//! configuration.

use std::fmt::Write;

use mercato_core::{ItemKind, Receipt};

use crate::config::{AppConfig, OutputFormat};
use crate::error::AppError;
use crate::scenarios::{Scenario, StepResult};

/// Renders a scenario in the configured output format.
pub fn render(config: &AppConfig, scenario: &Scenario) -> Result<String, AppError> {
    match config.output {
        OutputFormat::Text => Ok(text(config, scenario)),
        OutputFormat::Json => json(scenario),
    }
}

/// Pretty-printed JSON document for one scenario.
pub fn json(scenario: &Scenario) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(scenario)?)
}

/// Human-readable report for one scenario.
pub fn text(config: &AppConfig, scenario: &Scenario) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} | {} ===", config.store_name, scenario.title);

    for step in &scenario.steps {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- {} ---", step.label);

        match &step.result {
            StepResult::Completed(receipt) => out.push_str(&receipt_text(config, receipt)),
            StepResult::NothingToDo => {
                let _ = writeln!(out, "Cart is empty, nothing to check out.");
            }
            StepResult::NotFound(id) => {
                let _ = writeln!(out, "No item with id {} in the catalog.", id);
            }
            StepResult::Rejected(err) => {
                let _ = writeln!(out, "Rejected: {}", err);
            }
            StepResult::Listing(entries) if entries.is_empty() => {
                let _ = writeln!(out, "(none)");
            }
            StepResult::Listing(entries) => {
                for entry in entries {
                    let _ = writeln!(out, "- {}", entry);
                }
            }
        }
    }

    out
}

/// Receipt block: shipment notice for physical lines, e-mail notice for
/// digital ones, then the checkout totals.
pub fn receipt_text(config: &AppConfig, receipt: &Receipt) -> String {
    let mut out = String::new();
    let money = |amount: mercato_core::Money| config.format_currency(amount.cents());

    let shipped: Vec<_> = receipt
        .lines
        .iter()
        .filter(|line| line.fulfillment == ItemKind::Shippable)
        .collect();
    if !shipped.is_empty() {
        let _ = writeln!(out, "** Shipment notice **");
        for line in shipped {
            let _ = writeln!(out, "{}x {:<24} {:>14}", line.quantity, line.name, money(line.shipping));
        }
    }

    let emailed: Vec<_> = receipt
        .lines
        .iter()
        .filter(|line| line.fulfillment == ItemKind::Digital)
        .collect();
    if !emailed.is_empty() {
        let _ = writeln!(out, "** Delivery notice **");
        for line in emailed {
            let _ = writeln!(out, "{}x {} sent by e-mail", line.quantity, line.name);
        }
    }

    let _ = writeln!(out, "** Checkout receipt **");
    for line in &receipt.lines {
        let _ = writeln!(out, "{}x {:<24} {:>14}", line.quantity, line.name, money(line.line_total));
    }
    let _ = writeln!(out, "{}", "-".repeat(42));
    let _ = writeln!(out, "{:<27} {:>14}", "Subtotal", money(receipt.subtotal));
    let _ = writeln!(out, "{:<27} {:>14}", "Shipping", money(receipt.fulfillment));
    let _ = writeln!(out, "{:<27} {:>14}", "Amount", money(receipt.total));
    let _ = writeln!(out, "{:<27} {:>14}", "Balance", money(receipt.remaining_balance));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ErrorCode};
    use crate::scenarios::Step;
    use chrono::{TimeZone, Utc};
    use mercato_core::{Money, ReceiptLine};

    fn sample_receipt() -> Receipt {
        Receipt {
            receipt_id: "r-1".to_string(),
            customer: "Youssef".to_string(),
            completed_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            lines: vec![
                ReceiptLine {
                    item_id: "TV".to_string(),
                    name: "Television".to_string(),
                    quantity: 1,
                    unit_price: Money::from_major(400),
                    line_total: Money::from_major(400),
                    shipping: Money::from_major(50),
                    fulfillment: ItemKind::Shippable,
                },
                ReceiptLine {
                    item_id: "EBOOK".to_string(),
                    name: "Example book 3".to_string(),
                    quantity: 1,
                    unit_price: Money::from_major_minor(24, 99),
                    line_total: Money::from_major_minor(24, 99),
                    shipping: Money::zero(),
                    fulfillment: ItemKind::Digital,
                },
            ],
            subtotal: Money::from_major_minor(424, 99),
            fulfillment: Money::from_major(50),
            total: Money::from_major_minor(474, 99),
            remaining_balance: Money::from_major_minor(525, 1),
        }
    }

    #[test]
    fn test_receipt_text_sections() {
        let text = receipt_text(&AppConfig::default(), &sample_receipt());

        assert!(text.contains("** Shipment notice **"));
        assert!(text.contains("** Delivery notice **"));
        assert!(text.contains("1x Example book 3 sent by e-mail"));
        assert!(text.contains("474.99 EGP"));
        assert!(text.contains("525.01 EGP"));
    }

    #[test]
    fn test_text_renders_each_step() {
        let scenario = Scenario {
            title: "Demo".to_string(),
            steps: vec![
                Step {
                    label: "Empty".to_string(),
                    result: StepResult::NothingToDo,
                },
                Step {
                    label: "Refused".to_string(),
                    result: StepResult::Rejected(AppError::new(ErrorCode::Expired, "Cheese expired")),
                },
                Step {
                    label: "Inventory".to_string(),
                    result: StepResult::Listing(vec![]),
                },
            ],
        };

        let text = text(&AppConfig::default(), &scenario);
        assert!(text.starts_with("=== Mercato Demo Store | Demo ==="));
        assert!(text.contains("Cart is empty"));
        assert!(text.contains("Rejected: [Expired] Cheese expired"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn test_json_step_shape() {
        let scenario = Scenario {
            title: "Demo".to_string(),
            steps: vec![Step {
                label: "Buy".to_string(),
                result: StepResult::Completed(sample_receipt()),
            }],
        };

        let value: serde_json::Value = serde_json::from_str(&json(&scenario).unwrap()).unwrap();
        let step = &value["steps"][0];

        assert_eq!(step["result"]["status"], "completed");
        assert_eq!(step["result"]["detail"]["total"], 47499);
        assert_eq!(step["result"]["detail"]["lines"][0]["fulfillment"], "shippable");
    }
}
