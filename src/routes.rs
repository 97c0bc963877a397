use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeFile;

use crate::{
    handlers::{
        health_check,
        reservations::{
            create_reservation, delete_reservation, list_reservations, list_user_reservations,
            update_reservation,
        },
        users::{get_user_by_id, register_user},
        AppState,
    },
    middleware::apply_middleware,
};

/// Create the Axum router with all endpoints and middleware
pub fn create_router(store: AppState, landing_page: impl AsRef<Path>) -> Router {
    let router = Router::new()
        // Landing page
        .route_service("/", ServeFile::new(landing_page))
        .route("/health", get(health_check))
        // Users
        .route("/users/:id", get(get_user_by_id))
        .route("/signup", post(register_user))
        // Reservations
        .route(
            "/reservation",
            get(list_reservations)
                .post(create_reservation)
                .put(update_reservation),
        )
        .route(
            "/reservation/:id",
            get(list_user_reservations).delete(delete_reservation),
        )
        .with_state(store);

    apply_middleware(router)
}
