//! # Mercato Demo Library
//!
//! Thin orchestration over `mercato-core`: logging, configuration, the demo
//! scenarios and receipt rendering. No purchase rule lives here.
//!
//! ## Module Structure
//! ```text
//! src/
//! ├── main.rs        # Entry point (calls run())
//! ├── lib.rs         # This file: tracing setup, run()
//! ├── config.rs      # AppConfig from MERCATO_* variables
//! ├── error.rs       # AppError with serializable codes
//! ├── scenarios.rs   # Grocery and bookstore purchase flows
//! └── render.rs      # Text and JSON receipts
//! ```

pub mod config;
pub mod error;
pub mod render;
pub mod scenarios;

use chrono::Utc;
use mercato_core::CheckoutEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;

/// Runs every demo scenario and prints the reports.
pub fn run() -> Result<(), AppError> {
    // Initialize tracing (logging)
    init_tracing();

    info!("Starting Mercato demo v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    info!(
        store = %config.store_name,
        currency = %config.currency_code,
        output = ?config.output,
        "Configuration loaded"
    );

    let engine = CheckoutEngine::default();
    let scenarios = scenarios::all(&engine, Utc::now())?;

    for scenario in &scenarios {
        println!("{}", render::render(&config, scenario)?);
        info!(
            scenario = %scenario.title,
            steps = scenario.steps.len(),
            completed = scenario.completed_count(),
            "Scenario finished"
        );
    }

    Ok(())
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mercato_core=trace` - Show trace for the engine only
/// - Default: INFO level, DEBUG for the mercato crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mercato_core=debug,mercato_demo=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
