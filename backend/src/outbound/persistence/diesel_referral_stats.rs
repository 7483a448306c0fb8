//! PostgreSQL-backed referral counters for the dashboard.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::referral_stats_repository::{
    ReferralStatsError, ReferralStatsRepository,
};
use crate::domain::referral::ReferralStats;
use crate::domain::{ReferralStatus, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::referrals;

/// Diesel-backed implementation of the referral stats port.
#[derive(Clone)]
pub struct DieselReferralStatsRepository {
    pool: DbPool,
}

impl DieselReferralStatsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReferralStatsError {
    map_basic_diesel_error(
        error,
        ReferralStatsError::query,
        ReferralStatsError::connection,
    )
}

#[async_trait]
impl ReferralStatsRepository for DieselReferralStatsRepository {
    async fn stats_for_referrer(
        &self,
        referrer: &UserId,
    ) -> Result<ReferralStats, ReferralStatsError> {
        let referrer = *referrer.as_uuid();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReferralStatsError::connection))?;

        let total_referred: i64 = referrals::table
            .filter(referrals::referrer_id.eq(referrer))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let converted: i64 = referrals::table
            .filter(
                referrals::referrer_id
                    .eq(referrer)
                    .and(referrals::status.eq(ReferralStatus::Converted.as_str())),
            )
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ReferralStats {
            total_referred,
            converted,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping.
    use super::*;

    #[test]
    fn diesel_errors_map_to_query_errors() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, ReferralStatsError::Query { .. }));
    }
}
