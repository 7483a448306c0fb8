//! Domain ports: traits the domain core depends on (driven) and the traits
//! it offers to inbound adapters (driving).

mod macros;

pub mod driving;
pub mod purchase_ledger;
pub mod referral_stats_repository;
pub mod user_repository;

pub use driving::{
    DashboardQuery, FixtureDashboardQuery, FixtureLoginService, FixturePurchaseCommand,
    FixtureRegistrationService, LoginService, PurchaseCommand, RegistrationService,
};
#[cfg(test)]
pub use driving::{
    MockDashboardQuery, MockLoginService, MockPurchaseCommand, MockRegistrationService,
};
pub use purchase_ledger::{FixturePurchaseLedger, PurchaseLedger, PurchaseLedgerError};
#[cfg(test)]
pub use purchase_ledger::MockPurchaseLedger;
pub use referral_stats_repository::{
    FixtureReferralStatsRepository, ReferralStatsError, ReferralStatsRepository,
};
#[cfg(test)]
pub use referral_stats_repository::MockReferralStatsRepository;
pub use user_repository::{
    FixtureUserRepository, StoredCredentials, UserPersistenceError, UserRepository,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
