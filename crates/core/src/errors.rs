use serde::Serialize;
use thiserror::Error;

/// One field-level problem found while checking a submitted request body.
///
/// `field` uses the wire name (camelCase, dotted for nested entries such as
/// `addOns[2].id`) so the website can attach the message to the right input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Failures produced while turning a raw request into a priced quote.
///
/// Spam and rate-limit rejections never reach this enum; they are resolved at
/// the HTTP boundary before the quote pipeline runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("request validation failed ({} issue(s))", .0.len())]
    Validation(Vec<ValidationIssue>),
    #[error("postcode `{postcode}` resolves outside the serviceable area (district `{district}`)")]
    OutOfServiceArea { postcode: String, district: String },
    #[error("quote invariant violation: {0}")]
    Internal(String),
}

impl QuoteError {
    /// Text safe to show to the person filling in the form. Internal detail
    /// stays in `Display` and the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Some details look incomplete or invalid. Please review the highlighted fields and try again.",
            Self::OutOfServiceArea { .. } => {
                "This postcode is outside our standard service area. Please send an enquiry instead and we'll see what we can arrange."
            }
            Self::Internal(_) => "Something went wrong while pricing your booking. Please try again or contact us directly.",
        }
    }

    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        Self::Validation(issues)
    }
}
