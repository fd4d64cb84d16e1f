use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn payment_routes(state: Arc<AppState>) -> Router {
    // Stripe calls the webhook without a bearer token; the signature stands in for auth.
    let public_routes = Router::new().route("/webhook", post(handlers::webhook));

    let protected_routes = Router::new()
        .route("/book-now", post(handlers::book_now))
        .route("/get-bookings", get(handlers::get_bookings))
        .route("/get-booking-users", get(handlers::get_booking_users))
        .route("/records", get(handlers::get_records))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
