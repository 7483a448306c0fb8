//! Referral code generation.
//!
//! Codes are three random bytes rendered as six uppercase hex characters.
//! Effectively-unique only; real uniqueness comes from the user store's
//! unique constraint, and a collision there surfaces as a retryable creation
//! failure handled by the registration service.

use rand::Rng;

use crate::domain::user::ReferralCode;

/// Generate a fresh referral code from the thread-local RNG.
#[must_use]
pub fn generate() -> ReferralCode {
    generate_with(&mut rand::thread_rng())
}

/// Generate a fresh referral code from the supplied RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> ReferralCode {
    ReferralCode::from_bytes(rng.r#gen())
}
