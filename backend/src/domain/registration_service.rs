//! Account registration service.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::auth::RegistrationRequest;
use crate::domain::error::Error;
use crate::domain::password::CredentialHash;
use crate::domain::ports::driving::RegistrationService;
use crate::domain::ports::user_repository::{UserPersistenceError, UserRepository};
use crate::domain::referral_code;
use crate::domain::user::{NewUserAccount, ReferralCode, UserAccount, UserId};

/// Attempts at allocating a unique referral code before giving up.
const MAX_CODE_ATTEMPTS: u32 = 4;

/// Registration flow backed by a [`UserRepository`].
///
/// Hashes the password, resolves the optional referral code hint to a
/// referrer, then creates the account with a freshly generated referral code.
/// A code collision in the store is retried with a new code; the email unique
/// constraint is surfaced as a validation failure.
#[derive(Debug, Clone)]
pub struct RegistrationServiceImpl<R> {
    users: R,
}

impl<R: UserRepository> RegistrationServiceImpl<R> {
    /// Build the service over a user store.
    pub fn new(users: R) -> Self {
        Self { users }
    }

    /// Resolve the free-text referral hint to an existing referrer.
    ///
    /// Invalid or unknown codes degrade to "no referrer" rather than failing
    /// the registration, so a mistyped link never blocks sign-up.
    async fn resolve_referrer(&self, hint: Option<&str>) -> Result<Option<UserId>, Error> {
        let Some(hint) = hint else {
            return Ok(None);
        };
        let code = match ReferralCode::new(hint) {
            Ok(code) => code,
            Err(_) => {
                warn!(hint, "referral code hint is malformed, ignoring");
                return Ok(None);
            }
        };
        let referrer = self
            .users
            .find_by_referral_code(&code)
            .await
            .map_err(map_lookup_error)?;
        match referrer {
            Some(account) => Ok(Some(*account.id())),
            None => {
                warn!(code = %code, "referral code not found, ignoring");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<R: UserRepository> RegistrationService for RegistrationServiceImpl<R> {
    async fn register(&self, request: RegistrationRequest) -> Result<UserAccount, Error> {
        let credential = CredentialHash::derive(request.password())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        let referred_by = self.resolve_referrer(request.referral_code_hint()).await?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let account = UserAccount::register(
                UserId::random(),
                request.email().clone(),
                referral_code::generate(),
                referred_by,
            );
            let new_user = NewUserAccount {
                account: account.clone(),
                credential: credential.clone(),
            };
            match self.users.create_account(&new_user).await {
                Ok(()) => {
                    info!(
                        user_id = %account.id(),
                        referred = referred_by.is_some(),
                        "registered new user"
                    );
                    return Ok(account);
                }
                Err(UserPersistenceError::DuplicateReferralCode) => {
                    warn!(code = %account.referral_code(), "referral code collision, regenerating");
                }
                Err(UserPersistenceError::DuplicateEmail) => {
                    return Err(Error::invalid_request("User already exists"));
                }
                Err(UserPersistenceError::Connection { message }) => {
                    return Err(Error::service_unavailable(message));
                }
                Err(UserPersistenceError::Query { message }) => {
                    return Err(Error::internal(message));
                }
            }
        }
        Err(Error::conflict(
            "could not allocate a unique referral code, please retry",
        ))
    }
}

fn map_lookup_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        other => Error::internal(other.to_string()),
    }
}
