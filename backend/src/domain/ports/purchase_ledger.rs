//! Port for the purchase log and the conversion transaction.

use async_trait::async_trait;

use crate::domain::purchase::PurchaseOutcome;
use crate::domain::user::{Credits, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by purchase ledger adapters.
    pub enum PurchaseLedgerError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "purchase ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "purchase ledger query failed: {message}",
        /// The purchasing user does not exist.
        UserMissing => "purchasing user not found",
        /// The transaction lost a concurrency race and rolled back.
        /// Retryable: the client may replay the purchase.
        Conflict => "purchase transaction conflicted, retry",
    }
}

/// Port for recording purchases.
///
/// `record_purchase` runs the whole purchase/conversion decision as one
/// atomic unit: log the purchase, and if it is the user's first purchase and
/// a pending referral names them as referred, award both parties and flip
/// the referral to converted. All-or-nothing; concurrent first purchases by
/// the same user must produce at most one award.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Record a purchase for `user` and settle any pending referral.
    async fn record_purchase(&self, user: &UserId) -> Result<PurchaseOutcome, PurchaseLedgerError>;
}

/// Fixture implementation for tests that do not exercise purchases.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePurchaseLedger;

#[async_trait]
impl PurchaseLedger for FixturePurchaseLedger {
    async fn record_purchase(
        &self,
        _user: &UserId,
    ) -> Result<PurchaseOutcome, PurchaseLedgerError> {
        Ok(PurchaseOutcome::repeat_purchase(Credits::zero()))
    }
}
