// Reservation handlers
// CRUD over the bookings table

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use super::{ApiJson, AppState};
use crate::{
    error::{ApiError, ApiResult},
    models::ReservationRequest,
};

const RESERVATION_NOT_FOUND: &str = "Reservation not found";

/// List every booking, newest first
/// GET /reservation
///
/// An empty table is reported as 404 "No records", not as an empty array.
pub async fn list_reservations(State(store): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Fetching all reservations");

    let reservations = store.list_reservations().await?;
    if reservations.is_empty() {
        return Err(ApiError::not_found("No records"));
    }

    info!("Retrieved {} reservations", reservations.len());
    Ok((StatusCode::OK, Json(reservations)))
}

/// List the bookings owned by one user, newest first
/// GET /reservation/:id
pub async fn list_user_reservations(
    State(store): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Fetching reservations for user_id: {}", user_id);

    let reservations = store.list_reservations_for_user(&user_id).await?;
    if reservations.is_empty() {
        return Err(ApiError::not_found("Bookings does not exists"));
    }

    info!("Retrieved {} reservations for user_id: {}", reservations.len(), user_id);
    Ok((StatusCode::OK, Json(reservations)))
}

/// Create a booking
/// POST /reservation
pub async fn create_reservation(
    State(store): State<AppState>,
    ApiJson(request): ApiJson<ReservationRequest>,
) -> ApiResult<impl IntoResponse> {
    let fields = request.into_fields()?;
    info!("Creating reservation for {} on {}", fields.full_name, fields.date);

    let reservation = store.create_reservation(&fields).await?;

    info!("Successfully created reservation with id: {}", reservation.id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Reservation added successful",
            "details": reservation,
        })),
    ))
}

/// Replace a booking's fields
/// PUT /reservation
///
/// The target id travels in the body. `user_id` is accepted but never changed.
pub async fn update_reservation(
    State(store): State<AppState>,
    ApiJson(mut request): ApiJson<ReservationRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = request.take_id();
    let fields = request.into_fields()?;
    let id = id.ok_or_else(|| ApiError::not_found(RESERVATION_NOT_FOUND))?;

    info!("Updating reservation with id: {}", id);

    let reservation = store
        .update_reservation(&id, &fields)
        .await?
        .ok_or_else(|| ApiError::not_found(RESERVATION_NOT_FOUND))?;

    info!("Successfully updated reservation with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Reservation updated",
            "details": reservation,
        })),
    ))
}

/// Delete a booking
/// DELETE /reservation/:id
pub async fn delete_reservation(
    State(store): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Deleting reservation with id: {}", raw_id);

    // A non-numeric id cannot name a serial key
    let id: i32 = raw_id
        .parse()
        .map_err(|_| ApiError::not_found(RESERVATION_NOT_FOUND))?;

    let reservation = store
        .delete_reservation(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESERVATION_NOT_FOUND))?;

    info!("Successfully deleted reservation with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Reservation deleted successfully",
            "deletedReservation": reservation,
        })),
    ))
}
