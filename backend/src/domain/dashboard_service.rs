//! Dashboard query service.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ports::driving::DashboardQuery;
use crate::domain::ports::referral_stats_repository::{ReferralStatsError, ReferralStatsRepository};
use crate::domain::ports::user_repository::{UserPersistenceError, UserRepository};
use crate::domain::referral::DashboardSummary;
use crate::domain::user::{ReferralCode, UserId};

/// Dashboard aggregation over the user store and referral counters.
#[derive(Debug, Clone)]
pub struct DashboardQueryService<U, S> {
    users: U,
    stats: S,
    client_base_url: url::Url,
}

impl<U, S> DashboardQueryService<U, S>
where
    U: UserRepository,
    S: ReferralStatsRepository,
{
    /// Build the service. `client_base_url` is the front-end origin the
    /// share link points at.
    pub fn new(users: U, stats: S, client_base_url: url::Url) -> Self {
        Self {
            users,
            stats,
            client_base_url,
        }
    }

    fn referral_link(&self, code: &ReferralCode) -> url::Url {
        let mut link = self.client_base_url.clone();
        link.set_path("/register");
        link.set_query(Some(&format!("r={code}")));
        link
    }
}

#[async_trait]
impl<U, S> DashboardQuery for DashboardQueryService<U, S>
where
    U: UserRepository,
    S: ReferralStatsRepository,
{
    async fn dashboard(&self, user: &UserId) -> Result<DashboardSummary, Error> {
        let account = self
            .users
            .find_by_id(user)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let stats = self
            .stats
            .stats_for_referrer(user)
            .await
            .map_err(|err| match err {
                ReferralStatsError::Connection { message } => Error::service_unavailable(message),
                ReferralStatsError::Query { message } => Error::internal(message),
            })?;
        Ok(DashboardSummary {
            total_referred_users: stats.total_referred,
            converted_users: stats.converted,
            total_credits_earned: account.credits(),
            referral_link: self.referral_link(account.referral_code()),
        })
    }
}

fn map_user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        other => Error::internal(other.to_string()),
    }
}
