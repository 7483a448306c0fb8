//! PostgreSQL-backed user store adapter.
//!
//! Creates accounts together with their pending referral in one transaction
//! and serves the lookups used by login, registration, and the dashboard.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::user_repository::{
    StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CredentialHash, Credits, EmailAddress, NewUserAccount, ReferralCode, ReferralStatus,
    UserAccount, UserId,
};

use super::diesel_error_mapping::{
    map_basic_diesel_error, map_pool_error, unique_violation_constraint,
};
use super::models::{NewReferralRow, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{referrals, users};

/// Unique index names from the migrations, used to tell collisions apart.
const EMAIL_CONSTRAINT: &str = "users_email_key";
const REFERRAL_CODE_CONSTRAINT: &str = "users_referral_code_key";

/// Diesel-backed implementation of the user store port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_lookup_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_create_error(error: diesel::result::Error) -> UserPersistenceError {
    match unique_violation_constraint(&error) {
        Some(EMAIL_CONSTRAINT) => UserPersistenceError::duplicate_email(),
        Some(REFERRAL_CODE_CONSTRAINT) => UserPersistenceError::duplicate_referral_code(),
        _ => map_lookup_error(error),
    }
}

/// Translate a stored row into the domain account.
///
/// Stored values already passed domain validation on the way in, so a
/// failure here means the table was modified out of band.
fn row_to_account(row: &UserRow) -> Result<UserAccount, UserPersistenceError> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("corrupt email in store: {err}")))?;
    let code = ReferralCode::new(&row.referral_code).map_err(|err| {
        UserPersistenceError::query(format!("corrupt referral code in store: {err}"))
    })?;
    let credits = Credits::new(row.credits)
        .map_err(|err| UserPersistenceError::query(format!("corrupt credits in store: {err}")))?;
    Ok(UserAccount::from_parts(
        UserId::from_uuid(row.id),
        email,
        code,
        credits,
        row.referred_by.map(UserId::from_uuid),
        row.created_at,
    ))
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserPersistenceError> {
    let account = row_to_account(&row)?;
    let password_hash = CredentialHash::from_stored(row.password_hash).map_err(|err| {
        UserPersistenceError::query(format!("corrupt password hash in store: {err}"))
    })?;
    Ok(StoredCredentials {
        account,
        password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_account(&self, new_user: &NewUserAccount) -> Result<(), UserPersistenceError> {
        let account = &new_user.account;
        let user_row = NewUserRow {
            id: *account.id().as_uuid(),
            email: account.email().as_ref(),
            password_hash: new_user.credential.as_str(),
            referral_code: account.referral_code().as_ref(),
            credits: account.credits().value(),
            referred_by: account.referred_by().map(|id| *id.as_uuid()),
            created_at: account.created_at(),
        };
        let referral_row = account.referred_by().map(|referrer| NewReferralRow {
            id: Uuid::new_v4(),
            referrer_id: *referrer.as_uuid(),
            referred_id: *account.id().as_uuid(),
            status: ReferralStatus::Pending.as_str(),
            created_at: account.created_at(),
        });

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&user_row)
                    .execute(conn)
                    .await?;

                if let Some(referral_row) = referral_row {
                    diesel::insert_into(referrals::table)
                        .values(&referral_row)
                        .execute(conn)
                        .await?;
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_create_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let uuid = *id.as_uuid();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .find(uuid)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_lookup_error)?;
        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let email = email.as_ref().to_owned();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_lookup_error)?;
        row.map(row_to_credentials).transpose()
    }

    async fn find_by_referral_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let code = code.as_ref().to_owned();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::referral_code.eq(code))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_lookup_error)?;
        row.as_ref().map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row translation and error mapping.
    use chrono::Utc;

    use super::*;

    fn row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: "lina@test.com".to_owned(),
            password_hash: CredentialHash::derive("hunter2stronger")
                .expect("hashing succeeds")
                .as_str()
                .to_owned(),
            referral_code: "AAA111".to_owned(),
            credits: 4,
            referred_by: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rows_translate_to_accounts() {
        let row = row();
        let account = row_to_account(&row).expect("valid row");
        assert_eq!(account.email().as_ref(), "lina@test.com");
        assert_eq!(account.referral_code().as_ref(), "AAA111");
        assert_eq!(account.credits().value(), 4);
        assert_eq!(
            account.referred_by().map(|id| *id.as_uuid()),
            row.referred_by
        );
    }

    #[test]
    fn corrupt_rows_surface_as_query_errors() {
        let mut bad = row();
        bad.referral_code = "nope".to_owned();
        let err = row_to_account(&bad).expect_err("corrupt code fails");
        assert!(matches!(err, UserPersistenceError::Query { .. }));

        let mut bad = row();
        bad.credits = -1;
        let err = row_to_account(&bad).expect_err("corrupt credits fail");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[test]
    fn credentials_round_trip_the_stored_hash() {
        let stored = row_to_credentials(row()).expect("valid row");
        assert!(stored.password_hash.verify("hunter2stronger"));
        assert!(!stored.password_hash.verify("wrong"));
    }

    #[test]
    fn not_found_maps_to_a_query_error() {
        let err = map_lookup_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
