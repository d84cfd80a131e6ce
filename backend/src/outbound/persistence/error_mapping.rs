//! Translation of pool and Diesel failures into port errors.
//!
//! Both repository ports distinguish only `Connection` (store unreachable)
//! from `Query` (anything else), so one pair of helpers serves both. Callers
//! pass the port's snake_case constructors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto the port's connection variant.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure onto the port's query or connection variant.
///
/// Database messages are logged at `debug` and replaced by a fixed summary
/// so row contents never reach the domain.
pub(crate) fn map_diesel_error<E>(
    error: &DieselError,
    operation: &'static str,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    if let DieselError::DatabaseError(kind, info) = error {
        debug!(operation, ?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(operation, %error, "diesel operation failed");
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            connection(format!("{operation}: database connection lost"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query(format!("{operation}: referenced catalogue entry missing"))
        }
        DieselError::DeserializationError(_) => {
            query(format!("{operation}: row could not be decoded"))
        }
        _ => query(format!("{operation}: database error")),
    }
}
