// Models module

pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use reservation::{Reservation, ReservationFields, ReservationRequest};
pub use user::{RegisterUserRequest, User};
