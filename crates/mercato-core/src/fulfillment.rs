//! # Fulfillment Hooks
//!
//! Side effects run after a checkout has committed: shipping physical goods
//! and notifying the recipient of digital ones.
//!
//! Hooks are best-effort. They return nothing and cannot undo the commit;
//! an implementation that talks to a real carrier or mail server owns its
//! own retries.

use tracing::info;

use crate::item::Item;

/// Ships `quantity` units of a physical item.
pub trait ShippingService: Send + Sync {
    fn ship(&self, item: &Item, quantity: i64, address: &str);
}

/// Delivers a digital item to an e-mail recipient.
pub trait DeliveryNotifier: Send + Sync {
    fn notify(&self, item: &Item, recipient: &str);
}

/// Shipping hook that only records a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogShipping;

impl ShippingService for LogShipping {
    fn ship(&self, item: &Item, quantity: i64, address: &str) {
        info!(
            item_id = %item.id(),
            name = item.name(),
            quantity,
            address,
            "Shipment requested"
        );
    }
}

/// Notification hook that only records a structured log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl DeliveryNotifier for LogNotifier {
    fn notify(&self, item: &Item, recipient: &str) {
        info!(
            item_id = %item.id(),
            name = item.name(),
            format = item.format().unwrap_or("unspecified"),
            recipient,
            "Digital delivery sent"
        );
    }
}
