use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Message returned whenever one of the required booking fields is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fulfill all required fields";

/// A table booking as stored in the `bookings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub date: NaiveDate,
    pub number_of_guest: i32,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
}

/// A loosely typed body field.
///
/// Web forms send numbers as strings and phone numbers as numbers, so fields
/// are kept as raw JSON and handed to Postgres as text. The column casts
/// decide what is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FormValue(pub Value);

impl FormValue {
    /// `false` for `null`, `false`, `0` and `""`.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Text form bound to a statement parameter.
    pub fn into_text(self) -> String {
        match self.0 {
            Value::String(s) => s,
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i.to_string(),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    (f as i64).to_string()
                }
                _ => n.to_string(),
            },
            other => other.to_string(),
        }
    }
}

/// Body of `POST /reservation` and `PUT /reservation`.
///
/// `id` is only read by the update endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationRequest {
    pub id: Option<FormValue>,
    pub date: Option<FormValue>,
    pub number_of_guest: Option<FormValue>,
    pub full_name: Option<FormValue>,
    pub email: Option<FormValue>,
    pub phone_number: Option<FormValue>,
    pub description: Option<FormValue>,
    pub user_id: Option<FormValue>,
    pub title: Option<FormValue>,
}

/// Booking fields as text, ready to bind.
/// `date` and `number_of_guest` are cast by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationFields {
    pub date: String,
    pub number_of_guest: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
}

impl ReservationRequest {
    /// Split off the target id of an update. `null` counts as absent.
    pub fn take_id(&mut self) -> Option<String> {
        self.id.take().map(FormValue::into_text)
    }

    /// Check the five required fields and convert into [`ReservationFields`].
    ///
    /// A required field counts as missing when it is absent or falsy
    /// (`null`, `false`, `0`, `""`). Optional fields pass through as text.
    pub fn into_fields(self) -> Result<ReservationFields, ApiError> {
        let (Some(date), Some(number_of_guest), Some(full_name), Some(email), Some(phone_number)) = (
            required(self.date),
            required(self.number_of_guest),
            required(self.full_name),
            required(self.email),
            required(self.phone_number),
        ) else {
            return Err(ApiError::validation(MISSING_FIELDS_MESSAGE));
        };

        Ok(ReservationFields {
            date,
            number_of_guest,
            full_name,
            email,
            phone_number,
            description: self.description.map(FormValue::into_text),
            user_id: self.user_id.map(FormValue::into_text),
            title: self.title.map(FormValue::into_text),
        })
    }
}

fn required(value: Option<FormValue>) -> Option<String> {
    value.filter(FormValue::is_truthy).map(FormValue::into_text)
}
