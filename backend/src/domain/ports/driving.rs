//! Driving ports exposed to the HTTP layer.
//!
//! Handlers depend on these traits only; the server wires in the concrete
//! domain services at startup and fixtures in handler tests.

use async_trait::async_trait;

use crate::domain::auth::{LoginCredentials, RegistrationRequest};
use crate::domain::error::Error;
use crate::domain::purchase::PurchaseOutcome;
use crate::domain::referral::DashboardSummary;
use crate::domain::user::{Credits, UserAccount, UserId};

/// Registers new accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account, returning the stored form (credentials omitted).
    async fn register(&self, request: RegistrationRequest) -> Result<UserAccount, Error>;
}

/// Authenticates existing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the matching account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserAccount, Error>;
}

/// Records simulated purchases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseCommand: Send + Sync {
    /// Record a purchase for the signed-in user.
    async fn purchase(&self, user: &UserId) -> Result<PurchaseOutcome, Error>;
}

/// Builds the per-user dashboard view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Aggregate referral counters, balance, and the share link.
    async fn dashboard(&self, user: &UserId) -> Result<DashboardSummary, Error>;
}

/// Fixture registration service returning a canned account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationService;

#[async_trait]
impl RegistrationService for FixtureRegistrationService {
    async fn register(&self, request: RegistrationRequest) -> Result<UserAccount, Error> {
        let code = crate::domain::referral_code::generate();
        Ok(UserAccount::register(
            UserId::random(),
            request.email().clone(),
            code,
            None,
        ))
    }
}

/// Fixture login service rejecting every credential pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<UserAccount, Error> {
        Err(Error::unauthorized("Invalid email or password"))
    }
}

/// Fixture purchase command recording nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePurchaseCommand;

#[async_trait]
impl PurchaseCommand for FixturePurchaseCommand {
    async fn purchase(&self, _user: &UserId) -> Result<PurchaseOutcome, Error> {
        Ok(PurchaseOutcome::repeat_purchase(Credits::zero()))
    }
}

/// Fixture dashboard query returning an empty view.
#[derive(Debug, Clone)]
pub struct FixtureDashboardQuery {
    base: url::Url,
}

impl Default for FixtureDashboardQuery {
    fn default() -> Self {
        Self {
            base: url::Url::parse("http://localhost:3000")
                .unwrap_or_else(|err| panic!("static url must parse: {err}")),
        }
    }
}

#[async_trait]
impl DashboardQuery for FixtureDashboardQuery {
    async fn dashboard(&self, _user: &UserId) -> Result<DashboardSummary, Error> {
        Ok(DashboardSummary {
            total_referred_users: 0,
            converted_users: 0,
            total_credits_earned: Credits::zero(),
            referral_link: self.base.clone(),
        })
    }
}
