//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. Regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// User accounts.
    ///
    /// `email` and `referral_code` carry unique indexes; `credits` carries a
    /// non-negative CHECK constraint.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login identifier, stored lowercased.
        email -> Varchar,
        /// Argon2 hash in PHC string form.
        password_hash -> Text,
        /// Six uppercase hex characters.
        referral_code -> Varchar,
        /// Credit balance, only mutated by the purchase transaction.
        credits -> Int8,
        /// Referrer set at registration, never updated afterwards.
        referred_by -> Nullable<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Referral relationships, one row per `(referrer, referred)` pair.
    referrals (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The user who shared their code.
        referrer_id -> Uuid,
        /// The user who signed up with it.
        referred_id -> Uuid,
        /// Lifecycle state: `pending` or `converted`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only purchase log.
    purchases (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// The purchasing user.
        user_id -> Uuid,
        /// Display label picked by position in the log.
        product_name -> Varchar,
        /// Display amount in whole units.
        amount -> Int8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(purchases -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, referrals, purchases);
