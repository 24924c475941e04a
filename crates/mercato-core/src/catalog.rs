//! # Catalog
//!
//! Ordered collection of [`SharedItem`] handles.
//!
//! Ids are expected to be unique but the catalog does not enforce it:
//! lookup returns the first match in insertion order.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::item::{Item, SharedItem};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<SharedItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog { items: Vec::new() }
    }

    /// Adds an item and returns its shared handle.
    pub fn add(&mut self, item: Item) -> SharedItem {
        let shared = SharedItem::new(item);
        debug!(item_id = %shared.id(), "Item added to catalog");
        self.items.push(shared.clone());
        shared
    }

    /// First item with this id. Absence is not an error.
    pub fn find_by_id(&self, id: &str) -> Option<SharedItem> {
        self.items.iter().find(|i| i.id().as_str() == id).cloned()
    }

    /// Like [`Catalog::find_by_id`] but absence is [`CoreError::ItemNotFound`].
    pub fn require(&self, id: &str) -> CoreResult<SharedItem> {
        self.find_by_id(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    /// Removes and returns every item released strictly before `cutoff`.
    ///
    /// Items without a release date stay. Carts holding a removed item keep
    /// their own handle and are unaffected.
    pub fn purge_older_than(&mut self, cutoff: NaiveDate) -> Vec<SharedItem> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .items
            .drain(..)
            .partition(|item| item.with(|i| i.release_date().is_some_and(|d| d < cutoff)));

        self.items = kept;
        info!(%cutoff, removed = removed.len(), remaining = self.items.len(), "Catalog purged");
        removed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::checkout::CheckoutEngine;
    use crate::money::Money;
    use crate::party::Party;

    fn book(isbn: &str, year: i32) -> Item {
        Item::stocked(isbn, format!("Book {}", isbn), Money::from_cents(2999), 5)
            .unwrap()
            .released_on(NaiveDate::from_ymd_opt(year, 1, 1).unwrap())
    }

    #[test]
    fn test_find_by_id() {
        let mut catalog = Catalog::new();
        catalog.add(book("123456", 2001));

        assert!(catalog.find_by_id("123456").is_some());
        assert!(catalog.find_by_id("978-0987654321").is_none());
        assert!(matches!(
            catalog.require("978-0987654321"),
            Err(CoreError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut catalog = Catalog::new();
        let first = catalog.add(book("123456", 2001));
        catalog.add(book("123456", 2020));

        assert_eq!(catalog.len(), 2);
        assert!(catalog.find_by_id("123456").unwrap().ptr_eq(&first));
    }

    #[test]
    fn test_purge_older_than_is_strict() {
        let mut catalog = Catalog::new();
        catalog.add(book("A", 1999));
        catalog.add(book("B", 2010));
        catalog.add(book("C", 2025));
        catalog.add(Item::digital("D", "Undated", Money::zero(), None).unwrap());

        let cutoff = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let removed = catalog.purge_older_than(cutoff);

        let removed_ids: Vec<_> = removed.iter().map(|i| i.id().to_string()).collect();
        assert_eq!(removed_ids, vec!["A"]);

        let kept_ids: Vec<_> = catalog.iter().map(|i| i.id().to_string()).collect();
        assert_eq!(kept_ids, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_purge_does_not_affect_open_cart() {
        let mut catalog = Catalog::new();
        let held = catalog.add(book("A", 1990));
        let mut cart = Cart::new();
        cart.add(&held, 2).unwrap();

        let removed = catalog.purge_older_than(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(removed.len(), 1);
        assert!(catalog.is_empty());
        assert!(catalog.find_by_id("A").is_none());

        let mut party = Party::new("Youssef", Money::from_major(100)).unwrap();
        let outcome = CheckoutEngine::default()
            .checkout(&mut cart, &mut party)
            .unwrap();

        let receipt = outcome.receipt().unwrap();
        assert_eq!(receipt.lines[0].item_id, "A");
        assert_eq!(receipt.total, Money::from_cents(5998));
        assert_eq!(party.balance(), Money::from_cents(4002));
        assert_eq!(held.with(|i| i.remaining_stock()), Some(3));
        assert!(removed[0].ptr_eq(&held));
        assert!(cart.is_empty());
    }
}
