//! Port for user account persistence and lookups.

use async_trait::async_trait;

use crate::domain::password::CredentialHash;
use crate::domain::user::{EmailAddress, NewUserAccount, ReferralCode, UserAccount, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user store query failed: {message}",
        /// The email address is already registered.
        DuplicateEmail => "email already registered",
        /// The generated referral code collided with an existing one.
        /// Retryable: regenerate and create again.
        DuplicateReferralCode => "referral code already in use",
    }
}

/// Account plus credential hash, returned only by the login lookup.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// The persisted account.
    pub account: UserAccount,
    /// The stored argon2 hash to verify against.
    pub password_hash: CredentialHash,
}

/// Port for creating and reading user accounts.
///
/// `create_account` is the sole creator of users and of the initial pending
/// referral: when `account.referred_by()` is set, the adapter writes the user
/// row and the pending referral row in one transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account (and its pending referral, if any).
    async fn create_account(&self, new_user: &NewUserAccount)
    -> Result<(), UserPersistenceError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Find an account and its credential hash by email, for login.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Resolve a referral code to its owner.
    async fn find_by_referral_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create_account(
        &self,
        _new_user: &NewUserAccount,
    ) -> Result<(), UserPersistenceError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_credentials_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_referral_code(
        &self,
        _code: &ReferralCode,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_lookups_return_none() {
        let repo = FixtureUserRepository;
        assert!(
            repo.find_by_id(&UserId::random())
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
        let email = EmailAddress::new("lina@test.com").expect("valid email");
        assert!(
            repo.find_credentials_by_email(&email)
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
    }

    #[test]
    fn duplicate_errors_have_stable_messages() {
        assert_eq!(
            UserPersistenceError::duplicate_email().to_string(),
            "email already registered"
        );
        assert_eq!(
            UserPersistenceError::duplicate_referral_code().to_string(),
            "referral code already in use"
        );
    }
}
