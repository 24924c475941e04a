//! # Mercato Demo Entry Point
//!
//! Runs the sample scenarios against the purchase engine and prints their
//! receipts.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration from `MERCATO_*` variables
//! 3. Run each scenario with the log-only fulfillment hooks
//! 4. Render the reports to stdout

fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(err) = mercato_demo::run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
