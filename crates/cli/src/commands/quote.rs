use std::fs;
use std::path::Path;

use chrono::Utc;
use salonbook_core::catalogue::ServiceCatalogue;
use salonbook_core::config::{AppConfig, LoadOptions};
use salonbook_core::domain::booking::RawBookingRequest;
use salonbook_core::errors::{QuoteError, ValidationIssue};
use salonbook_core::quote::{build_booking_quote, QuoteOutcome};
use salonbook_core::validate;
use serde::Serialize;

use crate::commands::{effective_pricing, CommandResult};

#[derive(Debug, Serialize)]
struct QuoteReport {
    command: &'static str,
    status: &'static str,
    pricing_version: String,
    outcome: QuoteOutcome,
}

/// Price a booking request body exactly as the server would, without
/// touching the rate limiter or sending any email.
pub fn run(file: &Path) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("quote", "config_validation", error.to_string(), 2)
        }
    };
    let pricing = match effective_pricing(&config) {
        Ok(pricing) => pricing,
        Err(error) => {
            return CommandResult::failure("quote", "pricing_rules", error.to_string(), 2)
        }
    };

    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "quote",
                "file_read",
                format!("could not read `{}`: {error}", file.display()),
                2,
            )
        }
    };
    let request: RawBookingRequest = match serde_json::from_str(&raw) {
        Ok(request) => request,
        Err(error) => {
            return CommandResult::failure(
                "quote",
                "json_parse",
                format!("`{}` is not a booking request body: {error}", file.display()),
                2,
            )
        }
    };

    let booking = match validate::validate_booking(&request, &pricing) {
        Ok(booking) => booking,
        Err(issues) => {
            return CommandResult::failure("quote", "validation", issue_summary(&issues), 3)
        }
    };

    let catalogue = ServiceCatalogue::standard();
    let outcome = match build_booking_quote(&booking, &catalogue, &pricing, Utc::now()) {
        Ok(outcome) => outcome,
        Err(QuoteError::Validation(issues)) => {
            return CommandResult::failure("quote", "validation", issue_summary(&issues), 3)
        }
        Err(error @ QuoteError::OutOfServiceArea { .. }) => {
            return CommandResult::failure("quote", "out_of_service_area", error.to_string(), 4)
        }
        Err(QuoteError::Internal(detail)) => {
            return CommandResult::failure("quote", "catalogue", detail, 5)
        }
    };

    let report = QuoteReport {
        command: "quote",
        status: "ok",
        pricing_version: pricing.version.clone(),
        outcome,
    };
    CommandResult {
        exit_code: 0,
        output: serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"quote\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        }),
    }
}

fn issue_summary(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}
