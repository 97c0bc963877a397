// Handlers module
// HTTP handlers for the booking API

pub mod reservations;
pub mod users;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{error::ApiError, store::ReservationStore};

/// Router state: the injected store handle.
pub type AppState = Arc<dyn ReservationStore>;

/// `Json` extractor whose rejections render as `{"message": ...}` 400s.
///
/// A body sent without a JSON content type reads as an empty object, so the
/// handler's own field checks decide the response.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(ApiJson(T::default())),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

/// Health check handler
/// Returns "OK" with 200 status for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
