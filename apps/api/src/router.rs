use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use appointment_cell::appointment_routes;
use auth_cell::auth_routes;
use doctor_cell::doctor_routes;
use payment_cell::payment_routes;
use prescription_cell::prescription_routes;
use profile_cell::profile_routes;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::AppState;

async fn welcome() -> ApiResponse<()> {
    ApiResponse::message("Welcome to Telemedicine!")
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route Not Found!".to_string())
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/profile", profile_routes(state.clone()))
        .nest("/doctor", doctor_routes(state.clone()))
        .nest("/appointment", appointment_routes(state.clone()))
        .nest("/payment", payment_routes(state.clone()))
        .nest("/prescription", prescription_routes(state.clone()));

    let app = Router::new()
        .route("/", get(welcome))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir));

    let app = match state.config.api_prefix.as_str() {
        "" => app.merge(api),
        prefix => app.nest(prefix, api),
    };

    app.fallback(route_not_found)
}
