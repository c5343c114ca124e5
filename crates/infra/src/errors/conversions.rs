//! Conversions from external infrastructure errors into domain errors.

use ordersync_domain::OrderSyncError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub OrderSyncError);

impl From<InfraError> for OrderSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<OrderSyncError> for InfraError {
    fn from(value: OrderSyncError) -> Self {
        InfraError(value)
    }
}

trait IntoOrderSyncError {
    fn into_ordersync(self) -> OrderSyncError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → OrderSyncError */
/* -------------------------------------------------------------------------- */

impl IntoOrderSyncError for SqlError {
    fn into_ordersync(self) -> OrderSyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        OrderSyncError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        OrderSyncError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        OrderSyncError::Database("unique constraint violation".into())
                    }
                    _ => OrderSyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => OrderSyncError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                OrderSyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                OrderSyncError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => OrderSyncError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => OrderSyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_ordersync())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → OrderSyncError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(OrderSyncError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → OrderSyncError */
/* -------------------------------------------------------------------------- */

impl IntoOrderSyncError for HttpError {
    fn into_ordersync(self) -> OrderSyncError {
        if self.is_timeout() {
            return OrderSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return OrderSyncError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return OrderSyncError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => OrderSyncError::NotFound(message),
                400..=499 => OrderSyncError::InvalidInput(message),
                _ => OrderSyncError::Network(message),
            };
        }

        OrderSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ordersync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
