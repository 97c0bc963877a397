use serde::{Deserialize, Serialize};

/// Registered user of the booking app.
/// The `id` comes from the client (it is never generated here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Payload accepted by `POST /signup`.
/// Every field is optional at the JSON level; a missing `id` is handed to the
/// database as NULL and rejected there.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUserRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}
