//! Port for referrer-side referral counters.

use async_trait::async_trait;

use crate::domain::referral::ReferralStats;
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by referral stats adapters.
    pub enum ReferralStatsError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "referral stats connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "referral stats query failed: {message}",
    }
}

/// Read-only port for dashboard referral counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralStatsRepository: Send + Sync {
    /// Count referrals where `referrer` shared the code, total and converted.
    async fn stats_for_referrer(&self, referrer: &UserId)
    -> Result<ReferralStats, ReferralStatsError>;
}

/// Fixture implementation returning empty counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReferralStatsRepository;

#[async_trait]
impl ReferralStatsRepository for FixtureReferralStatsRepository {
    async fn stats_for_referrer(
        &self,
        _referrer: &UserId,
    ) -> Result<ReferralStats, ReferralStatsError> {
        Ok(ReferralStats::default())
    }
}
