// In-memory store used by the router tests.
// Mirrors the Postgres store: serial ids, newest-first listing, NULL id rejection,
// and text-to-date / text-to-integer casts that fail as query errors.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use tokio::sync::Mutex;

use super::{ReservationStore, StoreError};
use crate::models::{RegisterUserRequest, Reservation, ReservationFields, User};

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    offline: AtomicBool,
}

#[derive(Default)]
struct State {
    users: Vec<User>,
    reservations: BTreeMap<i32, Reservation>,
    last_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the pool could not hand out a connection.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    pub async fn reservation_count(&self) -> usize {
        self.state.lock().await.reservations.len()
    }

    pub async fn reservation(&self, id: i32) -> Option<Reservation> {
        self.state.lock().await.reservations.get(&id).cloned()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    async fn register_user(
        &self,
        request: &RegisterUserRequest,
    ) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let Some(id) = request.id.clone() else {
            return Err(StoreError::Constraint(
                "null value in column \"id\" of relation \"users\"".to_string(),
            ));
        };

        let mut state = self.state.lock().await;
        if state.users.iter().any(|user| user.id == id) {
            return Ok(None);
        }

        let user = User {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
        };
        state.users.push(user.clone());
        Ok(Some(user))
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        Ok(state.reservations.values().rev().cloned().collect())
    }

    async fn list_reservations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Reservation>, StoreError> {
        self.check_online()?;
        let state = self.state.lock().await;
        Ok(state
            .reservations
            .values()
            .rev()
            .filter(|reservation| reservation.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn create_reservation(
        &self,
        fields: &ReservationFields,
    ) -> Result<Reservation, StoreError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        let reservation = materialize(state.last_id + 1, fields, fields.user_id.clone())?;
        state.last_id = reservation.id;
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update_reservation(
        &self,
        id: &str,
        fields: &ReservationFields,
    ) -> Result<Option<Reservation>, StoreError> {
        self.check_online()?;
        let id = cast_integer(id)?;
        let mut state = self.state.lock().await;
        let Some(existing) = state.reservations.get_mut(&id) else {
            return Ok(None);
        };

        let updated = materialize(id, fields, existing.user_id.clone())?;
        *existing = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_reservation(&self, id: i32) -> Result<Option<Reservation>, StoreError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        Ok(state.reservations.remove(&id))
    }
}

/// Build a stored row the way the casts in the SQL statements would.
/// `owner` is stored as the owning user; updates pass the existing one.
fn materialize(
    id: i32,
    fields: &ReservationFields,
    owner: Option<String>,
) -> Result<Reservation, StoreError> {
    Ok(Reservation {
        id,
        date: cast_date(&fields.date)?,
        number_of_guest: cast_integer(&fields.number_of_guest)?,
        full_name: fields.full_name.clone(),
        email: fields.email.clone(),
        phone_number: fields.phone_number.clone(),
        description: fields.description.clone(),
        user_id: owner,
        title: fields.title.clone(),
    })
}

fn cast_integer(raw: &str) -> Result<i32, StoreError> {
    raw.trim().parse().map_err(|_| {
        StoreError::Query(format!("invalid input syntax for type integer: \"{raw}\""))
    })
}

// A subset of the input formats Postgres accepts for DATE under DateStyle ISO, MDY
fn cast_date(raw: &str) -> Result<NaiveDate, StoreError> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%m/%d/%Y", "%b %d %Y", "%B %d %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| StoreError::Query(format!("invalid input syntax for type date: \"{raw}\"")))
}
