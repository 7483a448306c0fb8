//! Purchase command service.

use async_trait::async_trait;
use tracing::info;

use crate::domain::error::Error;
use crate::domain::ports::driving::PurchaseCommand;
use crate::domain::ports::purchase_ledger::{PurchaseLedger, PurchaseLedgerError};
use crate::domain::purchase::PurchaseOutcome;
use crate::domain::user::UserId;

/// Purchase flow backed by a [`PurchaseLedger`].
///
/// The ledger adapter owns the atomicity of the purchase/conversion
/// transaction; this service only translates its failures into API errors.
/// A lost concurrency race surfaces as a retryable conflict rather than an
/// internal failure.
#[derive(Debug, Clone)]
pub struct PurchaseCommandService<L> {
    ledger: L,
}

impl<L: PurchaseLedger> PurchaseCommandService<L> {
    /// Build the service over a purchase ledger.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl<L: PurchaseLedger> PurchaseCommand for PurchaseCommandService<L> {
    async fn purchase(&self, user: &UserId) -> Result<PurchaseOutcome, Error> {
        let outcome = self
            .ledger
            .record_purchase(user)
            .await
            .map_err(|err| match err {
                PurchaseLedgerError::Connection { message } => Error::service_unavailable(message),
                PurchaseLedgerError::Query { message } => Error::internal(message),
                PurchaseLedgerError::UserMissing => Error::not_found("User not found"),
                PurchaseLedgerError::Conflict => {
                    Error::conflict("Purchase conflicted with another request, please retry")
                }
            })?;
        info!(user_id = %user, awarded = outcome.awarded, "recorded purchase");
        Ok(outcome)
    }
}
