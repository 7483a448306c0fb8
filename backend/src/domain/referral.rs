//! Referral relationship between a referrer and a referred user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::{Credits, UserId};

/// Fixed credit award granted to both parties on conversion.
pub const CONVERSION_AWARD: i64 = 2;

/// Lifecycle of a referral relationship.
///
/// A referral is created `Pending` when the referred user registers with a
/// valid code and flips to `Converted` exactly once, on that user's first
/// purchase. The transition never reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    /// The referred user signed up but has not purchased yet.
    Pending,
    /// The referred user's first purchase triggered the credit award.
    Converted,
}

impl ReferralStatus {
    /// Wire/storage form of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Converted => "converted",
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown referral status: {value}")]
pub struct ParseReferralStatusError {
    /// The offending value.
    pub value: String,
}

impl FromStr for ReferralStatus {
    type Err = ParseReferralStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "converted" => Ok(Self::Converted),
            other => Err(ParseReferralStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// One referral relationship.
///
/// ## Invariants
/// - At most one referral ever exists per `(referrer, referred)` pair; the
///   store enforces this with a unique index.
/// - Only the registration flow creates referrals; only the
///   purchase/conversion transaction mutates `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct Referral {
    id: Uuid,
    referrer: UserId,
    referred: UserId,
    status: ReferralStatus,
    created_at: DateTime<Utc>,
}

impl Referral {
    /// Create the pending referral recorded at registration time.
    #[must_use]
    pub fn pending(referrer: UserId, referred: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            referrer,
            referred,
            status: ReferralStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Row identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The user who shared their code.
    #[must_use]
    pub fn referrer(&self) -> &UserId {
        &self.referrer
    }

    /// The user who signed up with the code.
    #[must_use]
    pub fn referred(&self) -> &UserId {
        &self.referred
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> ReferralStatus {
        self.status
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Referrer-side counters surfaced on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferralStats {
    /// Referral rows where the user is the referrer.
    pub total_referred: i64,
    /// Subset of those rows with converted status.
    pub converted: i64,
}

/// Aggregated dashboard view for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Count of users this user referred.
    pub total_referred_users: i64,
    /// Count of those referrals that converted.
    pub converted_users: i64,
    /// The user's current credit balance.
    pub total_credits_earned: Credits,
    /// Shareable link embedding the user's referral code.
    pub referral_link: url::Url,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [ReferralStatus::Pending, ReferralStatus::Converted] {
            let parsed: ReferralStatus = status.as_str().parse().expect("round trip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "revoked".parse::<ReferralStatus>().expect_err("unknown status");
        assert_eq!(err.value, "revoked");
    }

    #[test]
    fn new_referrals_start_pending() {
        let referral = Referral::pending(UserId::random(), UserId::random());
        assert_eq!(referral.status(), ReferralStatus::Pending);
    }
}
