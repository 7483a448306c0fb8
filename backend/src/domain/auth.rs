//! Authentication and registration input types.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, UserValidationError};

/// Domain error returned when auth payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email did not look like an address.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

fn map_email_error(err: UserValidationError) -> AuthValidationError {
    match err {
        UserValidationError::EmptyEmail => AuthValidationError::EmptyEmail,
        _ => AuthValidationError::InvalidEmail,
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised via [`EmailAddress`].
/// - `password` must be non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(map_email_error)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email suitable for user lookups.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
///
/// The referral code hint is free text: it is only ever checked for existence
/// against the user store, so no format validation happens here. Blank hints
/// collapse to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    email: EmailAddress,
    password: Zeroizing<String>,
    referral_code_hint: Option<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        referral_code: Option<&str>,
    ) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(map_email_error)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        let referral_code_hint = referral_code
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(str::to_owned);
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            referral_code_hint,
        })
    }

    /// Normalised email for the new account.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password awaiting the explicit hashing step.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// The referral code supplied by the caller, if any.
    #[must_use]
    pub fn referral_code_hint(&self) -> Option<&str> {
        self.referral_code_hint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "pw", AuthValidationError::EmptyEmail)]
    #[case("   ", "pw", AuthValidationError::EmptyEmail)]
    #[case("not-an-email", "pw", AuthValidationError::InvalidEmail)]
    #[case("lina@test.com", "", AuthValidationError::EmptyPassword)]
    fn invalid_login_inputs(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err =
            LoginCredentials::try_from_parts(email, password).expect_err("invalid inputs fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn login_normalises_email_and_keeps_password_verbatim() {
        let creds = LoginCredentials::try_from_parts("  Lina@Test.com ", " pw ")
            .expect("valid inputs succeed");
        assert_eq!(creds.email().as_ref(), "lina@test.com");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" AAA111 "), Some("AAA111"))]
    #[case(Some("anything goes"), Some("anything goes"))]
    fn registration_hint_is_trimmed_not_validated(
        #[case] hint: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let request = RegistrationRequest::try_from_parts("ryan@test.com", "pw", hint)
            .expect("valid inputs succeed");
        assert_eq!(request.referral_code_hint(), expected);
    }
}
