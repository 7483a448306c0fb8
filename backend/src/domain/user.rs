//! User account model and its value objects.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::password::CredentialHash;

/// Validation errors returned by the user value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email did not look like `local@domain`.
    InvalidEmail,
    /// Referral code was not six uppercase hex characters.
    InvalidReferralCode,
    /// Credit balance would be negative.
    NegativeCredits,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidReferralCode => {
                write!(f, "referral code must be six uppercase hex characters")
            }
            Self::NegativeCredits => write!(f, "credits must not be negative"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Case-insensitive email address, stored lowercased.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lowercased at construction, so two
///   addresses differing only in case compare equal and hit the same unique
///   index.
/// - Must contain exactly one `@` with non-empty local and domain parts. Full
///   RFC validation is deliberately out of scope; the address is only used as
///   a login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Length of a referral code in characters.
pub const REFERRAL_CODE_LEN: usize = 6;

/// Short, URL-safe token identifying a user as a referrer.
///
/// ## Invariants
/// - Exactly [`REFERRAL_CODE_LEN`] uppercase hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Build a code from three random bytes. Uppercase hex expansion of three
    /// bytes always yields six valid characters, so no validation is needed.
    #[must_use]
    pub(crate) fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(hex::encode_upper(bytes))
    }

    /// Validate and construct a [`ReferralCode`].
    pub fn new(code: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let code = code.as_ref();
        let valid = code.len() == REFERRAL_CODE_LEN
            && code
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c));
        if !valid {
            return Err(UserValidationError::InvalidReferralCode);
        }
        Ok(Self(code.to_owned()))
    }
}

impl AsRef<str> for ReferralCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ReferralCode> for String {
    fn from(value: ReferralCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Non-negative credit balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Credits(i64);

impl Credits {
    /// The zero balance every account starts with.
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Validate and construct a balance from a stored value.
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        if value < 0 {
            return Err(UserValidationError::NegativeCredits);
        }
        Ok(Self(value))
    }

    /// The balance as a plain integer.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Credits> for i64 {
    fn from(value: Credits) -> Self {
        value.0
    }
}

impl TryFrom<i64> for Credits {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user account.
///
/// ## Invariants
/// - `referred_by` is set only at registration and never changes afterwards.
/// - `credits` never goes negative; only the purchase/conversion transaction
///   increments it.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    id: UserId,
    email: EmailAddress,
    referral_code: ReferralCode,
    credits: Credits,
    referred_by: Option<UserId>,
    created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Build a fresh account at registration time: zero credits, immutable
    /// referrer link.
    #[must_use]
    pub fn register(
        id: UserId,
        email: EmailAddress,
        referral_code: ReferralCode,
        referred_by: Option<UserId>,
    ) -> Self {
        Self {
            id,
            email,
            referral_code,
            credits: Credits::zero(),
            referred_by,
            created_at: Utc::now(),
        }
    }

    /// Rehydrate an account from persisted parts.
    #[must_use]
    pub fn from_parts(
        id: UserId,
        email: EmailAddress,
        referral_code: ReferralCode,
        credits: Credits,
        referred_by: Option<UserId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            referral_code,
            credits,
            referred_by,
            created_at,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login identifier, lowercased.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The code this user shares with others.
    #[must_use]
    pub fn referral_code(&self) -> &ReferralCode {
        &self.referral_code
    }

    /// Current credit balance.
    #[must_use]
    pub fn credits(&self) -> Credits {
        self.credits
    }

    /// The user who referred this account, when one exists.
    #[must_use]
    pub fn referred_by(&self) -> Option<&UserId> {
        self.referred_by.as_ref()
    }

    /// Registration timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Creation payload handed to the user store.
///
/// Bundles the account with its credential hash and keeps the pending
/// referral implicit: the store creates the referral row exactly when
/// `account.referred_by()` is set, so the two writes land in one transaction.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    /// The account to persist.
    pub account: UserAccount,
    /// Hash produced by the explicit credential-derivation step.
    pub credential: CredentialHash,
}
