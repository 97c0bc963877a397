// Store module
// Data-access seam between the HTTP handlers and the database

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio_postgres::error::SqlState;

use crate::models::{RegisterUserRequest, Reservation, ReservationFields, User};

/// Closed set of data-access failures.
/// Handlers never look inside; every kind ends up as a 500.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No usable connection: pool timeout, pool closed, or the connection dropped.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// SQLSTATE class 23 (not-null, unique, foreign key, check).
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.code() {
            Some(code) if code.code().starts_with("23") => StoreError::Constraint(err.to_string()),
            Some(&SqlState::CONNECTION_EXCEPTION)
            | Some(&SqlState::CONNECTION_DOES_NOT_EXIST)
            | Some(&SqlState::CONNECTION_FAILURE)
            | Some(&SqlState::ADMIN_SHUTDOWN) => StoreError::Unavailable(err.to_string()),
            None if err.is_closed() => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Backend(inner) => StoreError::from(inner),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Persistence operations behind the HTTP surface.
///
/// Each call is one statement on one pooled connection; implementations
/// return `Ok(None)` / an empty `Vec` for "no row" and leave the HTTP
/// meaning of that to the caller.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user unless one with the same id exists.
    /// `Ok(None)` means the id was already taken and nothing was written.
    async fn register_user(
        &self,
        request: &RegisterUserRequest,
    ) -> Result<Option<User>, StoreError>;

    /// All bookings, newest id first.
    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError>;

    /// Bookings owned by `user_id`, newest id first.
    async fn list_reservations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Reservation>, StoreError>;

    async fn create_reservation(
        &self,
        fields: &ReservationFields,
    ) -> Result<Reservation, StoreError>;

    /// Replace the mutable fields of booking `id`. The owning user is left as is.
    /// `id` is the raw body value; the database casts it.
    async fn update_reservation(
        &self,
        id: &str,
        fields: &ReservationFields,
    ) -> Result<Option<Reservation>, StoreError>;

    /// Delete booking `id`, returning the removed row.
    async fn delete_reservation(&self, id: i32) -> Result<Option<Reservation>, StoreError>;
}
