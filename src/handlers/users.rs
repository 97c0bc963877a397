// User handlers
// Lookup and registration

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
    models::RegisterUserRequest,
};

/// Get user by ID
/// GET /users/:id
pub async fn get_user_by_id(
    State(store): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Fetching user with id: {}", user_id);

    let user = store
        .find_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok((StatusCode::OK, Json(user)))
}

/// Register a new user
/// POST /signup
pub async fn register_user(
    State(store): State<AppState>,
    ApiJson(request): ApiJson<RegisterUserRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Registering user with id: {:?}", request.id);

    let user = store
        .register_user(&request)
        .await?
        .ok_or_else(|| ApiError::conflict("User existed"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User register successful",
            "details": user,
        })),
    ))
}
