use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;
use crate::models::MAX_IMAGE_BYTES;

/// Room for the image plus the text fields and multipart framing.
const UPDATE_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 2 * 1024 * 1024;

pub fn profile_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/get-profile", get(handlers::get_profile))
        .route(
            "/update-profile",
            put(handlers::update_profile).layer(DefaultBodyLimit::max(UPDATE_BODY_LIMIT)),
        )
        .route("/get-doctor-types", get(handlers::get_doctor_types))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
