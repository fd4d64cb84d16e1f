use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/types", get(handlers::get_doctor_types))
        .route("/getDoctorTypes", get(handlers::get_doctor_types));

    let protected_routes = Router::new()
        .route("/{doctor_id}/slots", get(handlers::get_doctor_slots))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
