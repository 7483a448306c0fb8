//! Password login service.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::auth::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::ports::driving::LoginService;
use crate::domain::ports::user_repository::{UserPersistenceError, UserRepository};
use crate::domain::user::UserAccount;

/// Uniform rejection for both unknown emails and wrong passwords, so the
/// response never reveals which accounts exist.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login flow backed by a [`UserRepository`].
#[derive(Debug, Clone)]
pub struct PasswordLoginService<R> {
    users: R,
}

impl<R: UserRepository> PasswordLoginService<R> {
    /// Build the service over a user store.
    pub fn new(users: R) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: UserRepository> LoginService for PasswordLoginService<R> {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserAccount, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(|err| match err {
                UserPersistenceError::Connection { message } => {
                    Error::service_unavailable(message)
                }
                other => Error::internal(other.to_string()),
            })?;
        let Some(stored) = stored else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !stored.password_hash.verify(credentials.password()) {
            warn!(user_id = %stored.account.id(), "password verification failed");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(stored.account)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::error::ErrorCode;
    use crate::domain::password::CredentialHash;
    use crate::domain::ports::user_repository::{MockUserRepository, StoredCredentials};
    use crate::domain::user::{EmailAddress, ReferralCode, UserId};

    use super::*;

    fn stored_user(password: &str) -> StoredCredentials {
        StoredCredentials {
            account: UserAccount::register(
                UserId::random(),
                EmailAddress::new("lina@test.com").expect("valid email"),
                ReferralCode::new("AAA111").expect("valid code"),
                None,
            ),
            password_hash: CredentialHash::derive(password).expect("hashing succeeds"),
        }
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("lina@test.com", password).expect("valid credentials")
    }

    #[tokio::test]
    async fn correct_password_authenticates() {
        let stored = stored_user("hunter2stronger");
        let expected_id = *stored.account.id();
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .once()
            .returning(move |_| Ok(Some(stored.clone())));
        let service = PasswordLoginService::new(users);

        let account = service
            .authenticate(&credentials("hunter2stronger"))
            .await
            .expect("login succeeds");
        assert_eq!(account.id(), &expected_id);
    }

    #[tokio::test]
    async fn wrong_password_gets_the_uniform_rejection() {
        let stored = stored_user("hunter2stronger");
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .once()
            .returning(move |_| Ok(Some(stored.clone())));
        let service = PasswordLoginService::new(users);

        let err = service
            .authenticate(&credentials("wrong-password"))
            .await
            .expect_err("wrong password fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn unknown_email_gets_the_same_rejection() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .once()
            .returning(|_| Ok(None));
        let service = PasswordLoginService::new(users);

        let err = service
            .authenticate(&credentials("hunter2stronger"))
            .await
            .expect_err("unknown email fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn connection_failure_is_not_an_auth_failure() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .once()
            .returning(|_| Err(UserPersistenceError::connection("pool exhausted")));
        let service = PasswordLoginService::new(users);

        let err = service
            .authenticate(&credentials("hunter2stronger"))
            .await
            .expect_err("connection failure propagates");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
