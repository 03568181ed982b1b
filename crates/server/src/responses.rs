//! JSON response shapes for the public form endpoints.
//!
//! Field names are camelCase because the website consumes these bodies
//! directly. Money fields serialize as plain JSON numbers.

use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use salonbook_core::{QuoteError, ValidationIssue};

pub const BOOKING_RECEIVED_MESSAGE: &str =
    "Thank you! Your booking request has been received. We'll confirm your appointment by email shortly.";

pub const ENQUIRY_RECEIVED_MESSAGE: &str =
    "Thanks for getting in touch. We'll reply within two working days.";

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again in a minute.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    pub booking_reference: String,
    pub deposit_required: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub deposit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryResponse {
    pub success: bool,
    pub enquiry_reference: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationIssue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enquiry_only: Option<bool>,
}

impl ApiError {
    pub fn bare(error: impl Into<String>) -> Self {
        Self { error: error.into(), message: None, details: None, enquiry_only: None }
    }

    pub fn rate_limited() -> (StatusCode, Json<Self>) {
        (StatusCode::TOO_MANY_REQUESTS, Json(Self::bare(RATE_LIMITED_MESSAGE)))
    }

    pub fn validation(issues: Vec<ValidationIssue>) -> (StatusCode, Json<Self>) {
        Self::from_quote_error(&QuoteError::Validation(issues))
    }

    pub fn from_quote_error(error: &QuoteError) -> (StatusCode, Json<Self>) {
        match error {
            QuoteError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                Json(Self {
                    error: "Some details need attention.".to_string(),
                    message: Some(error.user_message().to_string()),
                    details: Some(issues.clone()),
                    enquiry_only: None,
                }),
            ),
            QuoteError::OutOfServiceArea { .. } => (
                StatusCode::BAD_REQUEST,
                Json(Self {
                    error: "Postcode outside standard service area.".to_string(),
                    message: Some(error.user_message().to_string()),
                    details: None,
                    enquiry_only: Some(true),
                }),
            ),
            QuoteError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Self {
                    error: "Internal server error.".to_string(),
                    message: Some(error.user_message().to_string()),
                    details: None,
                    enquiry_only: None,
                }),
            ),
        }
    }
}
