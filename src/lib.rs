// Library root for the table booking API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use error::ApiError;
pub use models::{RegisterUserRequest, Reservation, ReservationFields, ReservationRequest, User};
pub use store::{ReservationStore, StoreError};
