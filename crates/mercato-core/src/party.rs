//! # Party
//!
//! The paying customer: a name, a funds balance and the contact details
//! fulfillment needs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation;

/// Contact information used by fulfillment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ContactInfo {
    /// Non-blank shipping address, if any.
    pub fn shipping_address(&self) -> Option<&str> {
        self.address.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// Non-blank e-mail, if any.
    pub fn email_address(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// A customer with a funds balance.
///
/// ## Invariants
/// - `balance >= 0`, enforced at construction and on every debit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    id: String,
    name: String,
    balance: Money,
    contact: ContactInfo,
}

impl Party {
    /// Creates a customer with an opening balance.
    pub fn new(name: impl Into<String>, balance: Money) -> CoreResult<Self> {
        let name = name.into();
        validation::validate_name("name", &name)?;
        validation::validate_balance_cents(balance.cents())?;

        Ok(Party {
            id: Uuid::new_v4().to_string(),
            name,
            balance,
            contact: ContactInfo::default(),
        })
    }

    /// Sets the e-mail address, validating its shape.
    pub fn with_email(mut self, email: impl Into<String>) -> CoreResult<Self> {
        let email = email.into();
        validation::validate_email(&email)?;
        self.contact.email = Some(email);
        Ok(self)
    }

    /// Sets the shipping address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.contact.address = Some(address.into());
        self
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn balance(&self) -> Money {
        self.balance
    }

    #[inline]
    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn can_afford(&self, amount: Money) -> bool {
        self.balance >= amount
    }

    /// Removes `amount` from the balance, or fails leaving it untouched.
    ///
    /// A negative amount is refused; a debit can never credit the party.
    pub fn debit(&mut self, amount: Money) -> CoreResult<()> {
        if amount.is_negative() {
            return Err(ValidationError::MustNotBeNegative {
                field: "debit amount".to_string(),
            }
            .into());
        }

        let remaining = self
            .balance
            .checked_sub_non_negative(amount)
            .ok_or_else(|| CoreError::InsufficientFunds {
                party: self.name.clone(),
                balance: self.balance,
                required: amount,
            })?;

        self.balance = remaining;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit() {
        let mut party = Party::new("Youssef", Money::from_major(1000)).unwrap();

        party.debit(Money::from_major(400)).unwrap();
        assert_eq!(party.balance(), Money::from_major(600));

        party.debit(Money::from_major(600)).unwrap();
        assert!(party.balance().is_zero());
    }

    #[test]
    fn test_debit_refuses_negative_amount() {
        let mut party = Party::new("Saif", Money::from_major(200)).unwrap();

        let err = party.debit(Money::from_cents(-500)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::MustNotBeNegative { .. })));
        assert_eq!(party.balance(), Money::from_major(200));
    }

    #[test]
    fn test_debit_insufficient_leaves_balance() {
        let mut party = Party::new("Mohammed", Money::from_major(100)).unwrap();

        let err = party.debit(Money::from_major(300)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientFunds { .. }));
        assert_eq!(party.balance(), Money::from_major(100));
        assert!(!party.can_afford(Money::from_major(300)));
        assert!(party.can_afford(Money::from_major(100)));
    }

    #[test]
    fn test_construction_validation() {
        assert!(Party::new("", Money::zero()).is_err());
        assert!(Party::new("Saif", Money::from_cents(-1)).is_err());
        assert!(Party::new("Saif", Money::zero())
            .unwrap()
            .with_email("not-an-email")
            .is_err());
    }

    #[test]
    fn test_contact_blank_values_are_absent() {
        let party = Party::new("Ali", Money::zero()).unwrap().with_address("   ");
        assert_eq!(party.contact().shipping_address(), None);
        assert_eq!(party.contact().email_address(), None);

        let party = party
            .with_address("123 Main Street")
            .with_email("ali@email.com")
            .unwrap();
        assert_eq!(party.contact().shipping_address(), Some("123 Main Street"));
        assert_eq!(party.contact().email_address(), Some("ali@email.com"));
    }
}
