//! Shared Diesel error mapping for the referral persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into an adapter-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Log a Diesel failure and map it into query/connection constructors.
///
/// Captures the repeated mapping used by adapters where closed connections
/// become connection errors and everything else becomes a query error.
/// Callers that care about specific database error kinds (unique violations,
/// serialisation failures) must match those before delegating here.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(String) -> E,
    C: Fn(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let error_message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                error = %error_message,
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error_message,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        _ => query(error_message),
    }
}

/// The constraint name reported with a unique violation, if any.
pub(crate) fn unique_violation_constraint(error: &diesel::result::Error) -> Option<&str> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    #[test]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("connection refused".to_owned()));
    }

    #[test]
    fn not_found_becomes_a_query_error() {
        let mapped =
            map_basic_diesel_error(diesel::result::Error::NotFound, Mapped::Query, Mapped::Connection);
        assert!(matches!(mapped, Mapped::Query(_)));
    }

    #[test]
    fn non_database_errors_have_no_constraint() {
        assert!(unique_violation_constraint(&diesel::result::Error::NotFound).is_none());
    }
}
