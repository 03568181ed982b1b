//! `POST /booking`: the quoting pipeline behind the public booking form.
//!
//! Guard order is fixed: rate limit, then honeypot, then field validation.
//! A rate-limited caller learns nothing about the honeypot, and a honeypot
//! hit is answered with a normal-looking success body so automated senders
//! cannot tell they were caught.
//!
//! Every figure in the response is computed server-side. Whatever totals the
//! client submitted are only compared against the computed outcome and logged
//! when they disagree.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use salonbook_core::domain::booking::RawBookingRequest;
use salonbook_core::quote::{self, anomaly};
use salonbook_core::reference::{self, ReferenceKind, SPAM_SENTINEL};
use salonbook_core::{validate, QuoteError};

use crate::bootstrap::AppState;
use crate::rate_limit::client_ip;
use crate::responses::{ApiError, BookingResponse, BOOKING_RECEIVED_MESSAGE};

pub async fn submit_booking(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<RawBookingRequest>,
) -> Result<Json<BookingResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();
    let ip = client_ip(&headers, peer);

    if !state.rate_limiter.check(ip).await.is_allowed() {
        return Err(ApiError::rate_limited());
    }

    if validate::honeypot_tripped(&body.website) {
        info!(
            event_name = "booking.request.spam_blocked",
            correlation_id = %correlation_id,
            client_ip = %ip,
            "honeypot field was filled in, dropping the booking silently"
        );
        return Ok(Json(BookingResponse {
            success: true,
            booking_reference: SPAM_SENTINEL.to_string(),
            deposit_required: false,
            deposit_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            message: BOOKING_RECEIVED_MESSAGE.to_string(),
        }));
    }

    let booking = validate::validate_booking(&body, &state.pricing)
        .map_err(|issues| rejected(&correlation_id, QuoteError::Validation(issues)))?;

    let outcome =
        quote::build_booking_quote(&booking, &state.catalogue, &state.pricing, Utc::now())
            .map_err(|quote_error| rejected(&correlation_id, quote_error))?;

    let mismatches = anomaly::diff_client_figures(&booking.client_figures, &outcome);
    if !mismatches.is_empty() {
        warn!(
            event_name = "booking.anomaly.figures_mismatch",
            correlation_id = %correlation_id,
            district = %outcome.area.district,
            summary = %anomaly::summarize(&mismatches),
            "client-submitted figures disagree with the computed quote"
        );
    }

    let booking_reference = reference::generate(ReferenceKind::Booking, Utc::now());

    info!(
        event_name = "booking.accepted",
        correlation_id = %correlation_id,
        reference = %booking_reference,
        district = %outcome.area.district,
        total = %outcome.breakdown.total,
        deposit_required = outcome.deposit.required,
        duration_minutes = outcome.breakdown.estimated_duration_minutes,
        pricing_version = %state.pricing.version,
        "booking accepted"
    );

    let report = state.notifier.booking_received(&booking, &outcome, &booking_reference).await;
    if !report.fully_sent() {
        warn!(
            event_name = "booking.notify.incomplete",
            correlation_id = %correlation_id,
            reference = %booking_reference,
            business = ?report.business,
            customer = ?report.customer,
            "booking accepted but notification delivery was incomplete"
        );
    }

    Ok(Json(BookingResponse {
        success: true,
        booking_reference,
        deposit_required: outcome.deposit.required,
        deposit_amount: outcome.deposit.amount,
        total: outcome.breakdown.total,
        message: BOOKING_RECEIVED_MESSAGE.to_string(),
    }))
}

fn rejected(correlation_id: &str, quote_error: QuoteError) -> (StatusCode, Json<ApiError>) {
    match &quote_error {
        QuoteError::Validation(issues) => info!(
            event_name = "booking.request.invalid",
            correlation_id = %correlation_id,
            issue_count = issues.len(),
            "booking request failed validation"
        ),
        QuoteError::OutOfServiceArea { district, .. } => info!(
            event_name = "booking.request.out_of_area",
            correlation_id = %correlation_id,
            district = %district,
            "postcode resolves outside the serviceable tiers"
        ),
        QuoteError::Internal(detail) => error!(
            event_name = "booking.quote.internal_error",
            correlation_id = %correlation_id,
            detail = %detail,
            "quote computation hit an invariant violation"
        ),
    }
    ApiError::from_quote_error(&quote_error)
}
