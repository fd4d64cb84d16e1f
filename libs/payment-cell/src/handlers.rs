use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Extension, Json,
};
use chrono::Utc;
use tracing::{debug, warn};

use shared_models::auth::AuthUser;
use shared_models::booking::BookingRecord;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_models::user::Role;
use shared_utils::extractor::ensure_role;
use shared_utils::validation::{parse_id, ValidatedJson};
use shared_utils::AppState;

use crate::models::{BookNowRequest, BookingDetailsResponse, PaymentError, PaymentIntentResponse, WebhookAck, WebhookEvent};
use crate::services::payment::PaymentService;
use crate::services::webhook::verify_signature;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

pub async fn book_now(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<BookNowRequest>,
) -> Result<ApiResponse<PaymentIntentResponse>, AppError> {
    let appointment_id = parse_id("appointmentId", &request.appointment_id)?;

    let payment_client_secret = PaymentService::new(&state)
        .create_payment_intent(user.id, appointment_id)
        .await?;

    Ok(ApiResponse::ok(
        PaymentIntentResponse { payment_client_secret },
        "Appointment booked successfully",
    ))
}

pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    if let Err(e) = verify_signature(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        state.config.webhook_tolerance_secs,
        Utc::now().timestamp(),
    ) {
        warn!("Webhook signature verification failed");
        return Err(e.into());
    }

    let event: WebhookEvent =
        serde_json::from_slice(&body).map_err(|e| PaymentError::InvalidPayload(e.to_string()))?;
    debug!("Received webhook event {} ({})", event.id, event.event_type);

    let ack = PaymentService::new(&state).handle_event(event).await?;
    Ok(Json(ack))
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<BookingDetailsResponse>, AppError> {
    let booking_details = PaymentService::new(&state).get_bookings(user.id).await?;
    Ok(ApiResponse::ok(
        BookingDetailsResponse { booking_details },
        "Booking Details fetched successfully",
    ))
}

pub async fn get_booking_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<BookingDetailsResponse>, AppError> {
    ensure_role(&user, &[Role::Doctor, Role::Admin])?;

    let booking_details = PaymentService::new(&state).get_booking_users(user.id).await?;
    Ok(ApiResponse::ok(
        BookingDetailsResponse { booking_details },
        "Booking Details fetched successfully",
    ))
}

pub async fn get_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<BookingRecord>>, AppError> {
    let records = PaymentService::new(&state).get_records(user.id).await?;
    Ok(ApiResponse::ok(records, "Payment records fetched successfully"))
}
