//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain persistence ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! The adapters stay thin: they translate between Diesel rows and domain
//! types and map database failures to port error types. Row structs
//! (`models.rs`) and schema definitions (`schema.rs`) are internal and never
//! exposed to the domain layer. The one piece of behaviour that lives here
//! is the purchase/conversion transaction in [`DieselPurchaseLedger`], whose
//! atomicity depends on database row locking.

mod diesel_error_mapping;
mod diesel_purchase_ledger;
mod diesel_referral_stats;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_purchase_ledger::DieselPurchaseLedger;
pub use diesel_referral_stats::DieselReferralStatsRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
