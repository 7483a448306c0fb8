//! Domain primitives, aggregates, and services.
//!
//! Types here are transport and storage agnostic. Keep them immutable,
//! validate at construction, and document invariants in each type's Rustdoc.
//! Inbound adapters translate HTTP payloads into these types; outbound
//! adapters translate them into database rows.

pub mod auth;
pub mod dashboard_service;
pub mod error;
pub mod login_service;
pub mod password;
pub mod ports;
pub mod purchase;
pub mod purchase_service;
pub mod referral;
pub mod referral_code;
pub mod registration_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{AuthValidationError, LoginCredentials, RegistrationRequest};
pub use self::dashboard_service::DashboardQueryService;
pub use self::error::{Error, ErrorCode};
pub use self::login_service::PasswordLoginService;
pub use self::password::{CredentialHash, CredentialHashError};
pub use self::purchase::{
    FIRST_PRODUCT_AMOUNT, FIRST_PRODUCT_NAME, PurchaseOutcome, REPEAT_PRODUCT_AMOUNT,
    REPEAT_PRODUCT_NAME,
};
pub use self::purchase_service::PurchaseCommandService;
pub use self::referral::{CONVERSION_AWARD, ReferralStatus};
pub use self::registration_service::RegistrationServiceImpl;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Credits, EmailAddress, NewUserAccount, ReferralCode, UserAccount, UserId, UserValidationError,
};

/// Convenient result alias for domain services and handlers.
pub type ApiResult<T> = Result<T, Error>;
