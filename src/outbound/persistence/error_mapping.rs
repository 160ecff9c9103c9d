//! Shared Diesel error mapping for the persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// A constraint violation pulled out of a Diesel database error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    /// A unique index rejected the write; carries the database message.
    Unique(String),
    /// A foreign key rejected the write; carries the database message.
    ForeignKey(String),
}

/// Extract a unique or foreign-key violation from a Diesel error, if any.
///
/// Adapters consult this before the generic mapping so the reconciliation
/// retry and the missing-contact path see their dedicated error variants.
pub(crate) fn constraint_violation(
    error: &diesel::result::Error,
) -> Option<ConstraintViolation> {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(ConstraintViolation::Unique(info.message().to_owned()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            Some(ConstraintViolation::ForeignKey(info.message().to_owned()))
        }
        _ => None,
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map the remaining Diesel error variants into query/connection constructors.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(String) -> E,
    C: Fn(String) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error".to_owned())
        }
        _ => query("database error".to_owned()),
    }
}
