//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{purchases, referrals, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub referral_code: String,
    pub credits: i64,
    pub referred_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub referral_code: &'a str,
    pub credits: i64,
    pub referred_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating the pending referral at registration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = referrals)]
pub(crate) struct NewReferralRow<'a> {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending to the purchase log.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = purchases)]
pub(crate) struct NewPurchaseRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_name: &'a str,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
