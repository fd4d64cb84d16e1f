use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn prescription_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/add-prescription", post(handlers::add_prescription))
        .route("/get-prescription", get(handlers::get_prescriptions))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
