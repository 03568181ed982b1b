//! Client figure cross-checks.
//!
//! The website quotes prices in the browser and echoes its arithmetic back
//! with the booking. The server never trusts those figures, but a mismatch
//! is worth logging: either the front-end price tables have drifted from
//! this crate's, or someone edited the payload by hand.

use serde::Serialize;

use crate::domain::booking::ClientSubmittedFigures;
use crate::quote::QuoteOutcome;

/// One client-submitted figure that disagrees with what the server computed.
///
/// Values render as strings so amounts and flags share one shape in logs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FigureMismatch {
    pub field: &'static str,
    pub submitted: String,
    pub computed: String,
}

/// Compare every figure the client sent against the server-side quote.
///
/// Absent fields are skipped: older front-end builds omit some of them.
/// Decimal comparison is numeric, so `35` and `35.00` agree.
pub fn diff_client_figures(
    figures: &ClientSubmittedFigures,
    outcome: &QuoteOutcome,
) -> Vec<FigureMismatch> {
    let mut mismatches = Vec::new();

    if let Some(total) = figures.total {
        if total != outcome.breakdown.total {
            mismatches.push(FigureMismatch {
                field: "total",
                submitted: total.to_string(),
                computed: outcome.breakdown.total.to_string(),
            });
        }
    }

    if let Some(required) = figures.deposit_required {
        if required != outcome.deposit.required {
            mismatches.push(FigureMismatch {
                field: "depositRequired",
                submitted: required.to_string(),
                computed: outcome.deposit.required.to_string(),
            });
        }
    }

    if let Some(amount) = figures.deposit_amount {
        if amount != outcome.deposit.amount {
            mismatches.push(FigureMismatch {
                field: "depositAmount",
                submitted: amount.to_string(),
                computed: outcome.deposit.amount.to_string(),
            });
        }
    }

    if let Some(fee) = figures.travel_fee {
        if fee != outcome.area.tier.fee {
            mismatches.push(FigureMismatch {
                field: "travelFee",
                submitted: fee.to_string(),
                computed: outcome.area.tier.fee.to_string(),
            });
        }
    }

    if let Some(duration) = figures.estimated_duration {
        let computed = rust_decimal::Decimal::from(outcome.breakdown.estimated_duration_minutes);
        if duration != computed {
            mismatches.push(FigureMismatch {
                field: "estimatedDuration",
                submitted: duration.to_string(),
                computed: computed.to_string(),
            });
        }
    }

    if let Some(is_colour) = figures.is_colour_service {
        if is_colour != outcome.is_colour_service {
            mismatches.push(FigureMismatch {
                field: "isColourService",
                submitted: is_colour.to_string(),
                computed: outcome.is_colour_service.to_string(),
            });
        }
    }

    mismatches
}

/// Single-line summary for the warning log.
pub fn summarize(mismatches: &[FigureMismatch]) -> String {
    let fields: Vec<&str> = mismatches.iter().map(|m| m.field).collect();
    format!("{} figure(s) disagree: {}", mismatches.len(), fields.join(", "))
}
