//! Simulated purchases and the outcome of recording one.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::{Credits, UserId};

/// Product label recorded for a user's first purchase.
pub const FIRST_PRODUCT_NAME: &str = "First Product";
/// Amount recorded for a user's first purchase. Display bookkeeping only.
pub const FIRST_PRODUCT_AMOUNT: i64 = 10;
/// Product label recorded for every later purchase.
pub const REPEAT_PRODUCT_NAME: &str = "Another Product";
/// Amount recorded for every later purchase. Display bookkeeping only.
pub const REPEAT_PRODUCT_AMOUNT: i64 = 15;

/// One entry in the append-only purchase log.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    id: Uuid,
    user: UserId,
    product_name: String,
    amount: i64,
    created_at: DateTime<Utc>,
}

impl Purchase {
    /// Record the purchase for a user, picking label and amount by position
    /// in the log. Credit logic never depends on these values.
    #[must_use]
    pub fn simulated(user: UserId, is_first: bool) -> Self {
        let (product_name, amount) = if is_first {
            (FIRST_PRODUCT_NAME, FIRST_PRODUCT_AMOUNT)
        } else {
            (REPEAT_PRODUCT_NAME, REPEAT_PRODUCT_AMOUNT)
        };
        Self {
            id: Uuid::new_v4(),
            user,
            product_name: product_name.to_owned(),
            amount,
            created_at: Utc::now(),
        }
    }

    /// Row identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The purchasing user.
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Product label shown in bookkeeping views.
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product_name.as_str()
    }

    /// Purchase amount in whole units.
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Purchase timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Result of the purchase/conversion transaction.
///
/// `credits` carries the purchasing user's balance as committed by the same
/// transaction, for dashboard display.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOutcome {
    /// Whether a conversion award happened.
    pub awarded: bool,
    /// User-facing status message.
    pub message: String,
    /// The purchasing user's post-transaction balance.
    pub credits: Credits,
}

impl PurchaseOutcome {
    /// Outcome for a repeat purchase: recorded, no credit change.
    #[must_use]
    pub fn repeat_purchase(credits: Credits) -> Self {
        Self {
            awarded: false,
            message: "Purchase successful, but no credits awarded.".to_owned(),
            credits,
        }
    }

    /// Outcome for a first purchase with no pending referral.
    #[must_use]
    pub fn first_without_referral(credits: Credits) -> Self {
        Self {
            awarded: false,
            message: "First purchase successful! No referral credits applied.".to_owned(),
            credits,
        }
    }

    /// Outcome for a first purchase that converted a pending referral.
    #[must_use]
    pub fn converted(credits: Credits) -> Self {
        Self {
            awarded: true,
            message: "First purchase successful! You and your referrer earned 2 credits."
                .to_owned(),
            credits,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn first_purchase_uses_first_product_bookkeeping() {
        let purchase = Purchase::simulated(UserId::random(), true);
        assert_eq!(purchase.product_name(), FIRST_PRODUCT_NAME);
        assert_eq!(purchase.amount(), FIRST_PRODUCT_AMOUNT);
    }

    #[test]
    fn repeat_purchase_uses_repeat_product_bookkeeping() {
        let purchase = Purchase::simulated(UserId::random(), false);
        assert_eq!(purchase.product_name(), REPEAT_PRODUCT_NAME);
        assert_eq!(purchase.amount(), REPEAT_PRODUCT_AMOUNT);
    }

    #[test]
    fn only_conversion_awards() {
        let credits = Credits::zero();
        assert!(!PurchaseOutcome::repeat_purchase(credits).awarded);
        assert!(!PurchaseOutcome::first_without_referral(credits).awarded);
        assert!(PurchaseOutcome::converted(credits).awarded);
    }
}
