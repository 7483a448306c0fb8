//! PostgreSQL-backed purchase ledger adapter.
//!
//! Owns the purchase/conversion transaction. The buyer's user row is locked
//! with `SELECT ... FOR UPDATE` before the prior-purchase count, so two
//! concurrent first purchases by the same user serialise and at most one of
//! them settles the pending referral. Cross-user purchases stay parallel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::purchase_ledger::{PurchaseLedger, PurchaseLedgerError};
use crate::domain::{CONVERSION_AWARD, Credits, PurchaseOutcome, ReferralStatus, UserId};
use crate::domain::purchase::Purchase;

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::NewPurchaseRow;
use super::pool::DbPool;
use super::schema::{purchases, referrals, users};

/// How the transaction settled, before credits are validated domain-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    Repeat,
    FirstWithoutReferral,
    Converted,
}

/// Diesel-backed implementation of the purchase ledger port.
#[derive(Clone)]
pub struct DieselPurchaseLedger {
    pool: DbPool,
}

impl DieselPurchaseLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_transaction_error(error: diesel::result::Error) -> PurchaseLedgerError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::NotFound => PurchaseLedgerError::user_missing(),
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            PurchaseLedgerError::conflict()
        }
        // Postgres deadlocks (SQLSTATE 40P01) surface as Unknown; they are as
        // safe to retry as serialization failures.
        DieselError::DatabaseError(_, ref info) if info.message().contains("deadlock detected") => {
            PurchaseLedgerError::conflict()
        }
        other => map_basic_diesel_error(
            other,
            PurchaseLedgerError::query,
            PurchaseLedgerError::connection,
        ),
    }
}

fn outcome_from(settlement: Settlement, credits: i64) -> Result<PurchaseOutcome, PurchaseLedgerError> {
    let credits = Credits::new(credits).map_err(|err| {
        PurchaseLedgerError::query(format!("corrupt credits after settlement: {err}"))
    })?;
    Ok(match settlement {
        Settlement::Repeat => PurchaseOutcome::repeat_purchase(credits),
        Settlement::FirstWithoutReferral => PurchaseOutcome::first_without_referral(credits),
        Settlement::Converted => PurchaseOutcome::converted(credits),
    })
}

#[async_trait]
impl PurchaseLedger for DieselPurchaseLedger {
    async fn record_purchase(
        &self,
        user: &UserId,
    ) -> Result<PurchaseOutcome, PurchaseLedgerError> {
        let buyer = *user.as_uuid();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, PurchaseLedgerError::connection))?;

        let (settlement, credits) = conn
            .transaction(|conn| {
                async move {
                    // Row lock linearises concurrent purchases per user and
                    // yields NotFound when the buyer does not exist.
                    let mut credits: i64 = users::table
                        .find(buyer)
                        .select(users::credits)
                        .for_update()
                        .first(conn)
                        .await?;

                    let prior: i64 = purchases::table
                        .filter(purchases::user_id.eq(buyer))
                        .count()
                        .get_result(conn)
                        .await?;

                    let purchase = Purchase::simulated(UserId::from_uuid(buyer), prior == 0);
                    let purchase_row = NewPurchaseRow {
                        id: purchase.id(),
                        user_id: buyer,
                        product_name: purchase.product_name(),
                        amount: purchase.amount(),
                        created_at: purchase.created_at(),
                    };
                    diesel::insert_into(purchases::table)
                        .values(&purchase_row)
                        .execute(conn)
                        .await?;

                    if prior > 0 {
                        return Ok((Settlement::Repeat, credits));
                    }

                    let pending: Option<(uuid::Uuid, uuid::Uuid)> = referrals::table
                        .filter(
                            referrals::referred_id
                                .eq(buyer)
                                .and(referrals::status.eq(ReferralStatus::Pending.as_str())),
                        )
                        .select((referrals::id, referrals::referrer_id))
                        .first(conn)
                        .await
                        .optional()?;

                    let Some((referral_id, referrer_id)) = pending else {
                        return Ok((Settlement::FirstWithoutReferral, credits));
                    };

                    diesel::update(users::table.find(referrer_id))
                        .set(users::credits.eq(users::credits + CONVERSION_AWARD))
                        .execute(conn)
                        .await?;
                    credits = diesel::update(users::table.find(buyer))
                        .set(users::credits.eq(users::credits + CONVERSION_AWARD))
                        .returning(users::credits)
                        .get_result(conn)
                        .await?;

                    // Guarded flip: the status predicate keeps the award
                    // single-shot even if the referral was settled elsewhere.
                    let flipped = diesel::update(
                        referrals::table.find(referral_id).filter(
                            referrals::status.eq(ReferralStatus::Pending.as_str()),
                        ),
                    )
                    .set(referrals::status.eq(ReferralStatus::Converted.as_str()))
                    .execute(conn)
                    .await?;
                    if flipped == 0 {
                        return Err(diesel::result::Error::RollbackTransaction);
                    }

                    Ok((Settlement::Converted, credits))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_transaction_error)?;

        outcome_from(settlement, credits)
    }
}
