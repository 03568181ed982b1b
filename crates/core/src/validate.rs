//! Schema validation for the two public request bodies.
//!
//! Checks shape only: required fields, length floors, non-negative numbers,
//! enum membership, consent flags, nested array item shapes. Catalogue
//! resolution (unknown ids, hourly billing) happens later in the quote
//! pipeline. Issues collect rather than short-circuit so the website can
//! highlight every broken field at once.

use rust_decimal::Decimal;

use crate::domain::booking::{ClientSubmittedFigures, RawBookingRequest, ValidatedBooking};
use crate::domain::enquiry::{EnquiryReason, RawEnquiryRequest, ValidatedEnquiry};
use crate::errors::ValidationIssue;
use crate::quote::area::normalize_postcode;
use crate::quote::config::PricingConfig;

const MIN_NAME_CHARS: usize = 2;
const MIN_ADDRESS_CHARS: usize = 5;
const MIN_MESSAGE_CHARS: usize = 20;
const MAX_FREE_TEXT_CHARS: usize = 2000;
const MAX_TIME_BASED_HOURS: u32 = 12;

/// True when the hidden `website` field arrived with content. Bots fill every
/// input they can see; people never see this one.
pub fn honeypot_tripped(website: &Option<String>) -> bool {
    website.as_deref().map(|value| !value.trim().is_empty()).unwrap_or(false)
}

pub fn validate_booking(
    raw: &RawBookingRequest,
    config: &PricingConfig,
) -> Result<ValidatedBooking, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let service_type = require_text(&mut issues, "serviceType", &raw.service_type);
    let selected_option = require_text(&mut issues, "selectedOption", &raw.selected_option);
    let service_name = require_text(&mut issues, "serviceName", &raw.service_name);
    let option_name = require_text(&mut issues, "optionName", &raw.option_name);
    let selected_date = require_text(&mut issues, "selectedDate", &raw.selected_date);
    let selected_time = require_text(&mut issues, "selectedTime", &raw.selected_time);

    let client_name = require_text(&mut issues, "clientName", &raw.client_name);
    if let Some(name) = &client_name {
        if name.chars().count() < MIN_NAME_CHARS {
            issues.push(ValidationIssue::new("clientName", "must be at least 2 characters"));
        }
    }

    let client_email = require_text(&mut issues, "clientEmail", &raw.client_email);
    if let Some(email) = &client_email {
        if !plausible_email(email) {
            issues.push(ValidationIssue::new("clientEmail", "must be a valid email address"));
        }
    }

    let client_phone = require_text(&mut issues, "clientPhone", &raw.client_phone);
    if let Some(phone) = &client_phone {
        if !plausible_phone(phone) {
            issues.push(ValidationIssue::new("clientPhone", "must be a valid contact number"));
        }
    }

    let postcode = require_text(&mut issues, "postcode", &raw.postcode);
    if let Some(value) = &postcode {
        check_postcode_shape(&mut issues, value);
    }

    let address = require_text(&mut issues, "address", &raw.address);
    if let Some(value) = &address {
        if value.chars().count() < MIN_ADDRESS_CHARS {
            issues.push(ValidationIssue::new("address", "must be a full street address"));
        }
    }

    require_consent(&mut issues, "consentBoundaries", &raw.consent_boundaries);
    require_consent(&mut issues, "consentCancellation", &raw.consent_cancellation);
    require_consent(&mut issues, "consentWomenOnly", &raw.consent_women_only);

    let mut add_on_ids = Vec::with_capacity(raw.add_ons.len());
    for (index, add_on) in raw.add_ons.iter().enumerate() {
        match trimmed(&add_on.id) {
            Some(id) => add_on_ids.push(id),
            None => {
                issues.push(ValidationIssue::new(format!("addOns[{index}].id"), "is required"));
            }
        }
        check_non_negative(&mut issues, format!("addOns[{index}].price"), &add_on.price);
        check_non_negative(&mut issues, format!("addOns[{index}].duration"), &add_on.duration);
    }

    let mut additional_client_service_ids = Vec::with_capacity(raw.additional_clients.len());
    for (index, client) in raw.additional_clients.iter().enumerate() {
        match trimmed(&client.service_id) {
            Some(id) => additional_client_service_ids.push(id),
            None => {
                issues.push(ValidationIssue::new(
                    format!("additionalClients[{index}].serviceId"),
                    "is required",
                ));
            }
        }
        check_non_negative(&mut issues, format!("additionalClients[{index}].price"), &client.price);
        check_non_negative(
            &mut issues,
            format!("additionalClients[{index}].duration"),
            &client.duration,
        );
    }
    let max_additional = config.group.max_additional_clients as usize;
    if raw.additional_clients.len() > max_additional {
        issues.push(ValidationIssue::new(
            "additionalClients",
            format!("supports at most {max_additional} additional clients per visit"),
        ));
    }

    let time_based_hours = match &raw.time_based_selection {
        Some(selection) => {
            check_non_negative(&mut issues, "timeBasedSelection.price", &selection.price);
            match selection.hours {
                Some(hours) if hours > Decimal::ZERO => {
                    if hours > Decimal::from(MAX_TIME_BASED_HOURS) {
                        issues.push(ValidationIssue::new(
                            "timeBasedSelection.hours",
                            format!("must be {MAX_TIME_BASED_HOURS} hours or fewer"),
                        ));
                        None
                    } else {
                        Some(hours)
                    }
                }
                _ => {
                    issues.push(ValidationIssue::new(
                        "timeBasedSelection.hours",
                        "must be a positive number of hours",
                    ));
                    None
                }
            }
        }
        None => None,
    };

    check_non_negative(&mut issues, "travelFee", &raw.travel_fee);
    check_non_negative(&mut issues, "total", &raw.total);
    check_non_negative(&mut issues, "depositAmount", &raw.deposit_amount);
    check_non_negative(&mut issues, "estimatedDuration", &raw.estimated_duration);

    let special_requests = trimmed(&raw.special_requests);
    if let Some(text) = &special_requests {
        if text.chars().count() > MAX_FREE_TEXT_CHARS {
            issues.push(ValidationIssue::new(
                "specialRequests",
                format!("must be {MAX_FREE_TEXT_CHARS} characters or fewer"),
            ));
        }
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    // The default fallbacks below are unreachable: every None pushed an issue above.
    Ok(ValidatedBooking {
        service_type: service_type.unwrap_or_default(),
        selected_option: selected_option.unwrap_or_default(),
        service_name: service_name.unwrap_or_default(),
        option_name: option_name.unwrap_or_default(),
        add_on_ids,
        hair_length_surcharge: raw.hair_length_surcharge.unwrap_or(false),
        additional_client_service_ids,
        time_based_hours,
        postcode: postcode.unwrap_or_default(),
        address: address.unwrap_or_default(),
        selected_date: selected_date.unwrap_or_default(),
        selected_time: selected_time.unwrap_or_default(),
        is_same_day: raw.is_same_day.unwrap_or(false),
        client_name: client_name.unwrap_or_default(),
        client_email: client_email.unwrap_or_default(),
        client_phone: client_phone.unwrap_or_default(),
        special_requests,
        is_new_client: raw.is_new_client.unwrap_or(false),
        client_figures: ClientSubmittedFigures {
            total: raw.total,
            deposit_required: raw.deposit_required,
            deposit_amount: raw.deposit_amount,
            travel_fee: raw.travel_fee,
            estimated_duration: raw.estimated_duration,
            is_colour_service: raw.is_colour_service,
        },
    })
}

pub fn validate_enquiry(raw: &RawEnquiryRequest) -> Result<ValidatedEnquiry, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let postcode = require_text(&mut issues, "postcode", &raw.postcode);
    if let Some(value) = &postcode {
        check_postcode_shape(&mut issues, value);
    }

    let client_name = require_text(&mut issues, "clientName", &raw.client_name);
    if let Some(name) = &client_name {
        if name.chars().count() < MIN_NAME_CHARS {
            issues.push(ValidationIssue::new("clientName", "must be at least 2 characters"));
        }
    }

    let client_email = require_text(&mut issues, "clientEmail", &raw.client_email);
    if let Some(email) = &client_email {
        if !plausible_email(email) {
            issues.push(ValidationIssue::new("clientEmail", "must be a valid email address"));
        }
    }

    let client_phone = require_text(&mut issues, "clientPhone", &raw.client_phone);
    if let Some(phone) = &client_phone {
        if !plausible_phone(phone) {
            issues.push(ValidationIssue::new("clientPhone", "must be a valid contact number"));
        }
    }

    let message = require_text(&mut issues, "message", &raw.message);
    if let Some(text) = &message {
        let chars = text.chars().count();
        if chars < MIN_MESSAGE_CHARS {
            issues.push(ValidationIssue::new(
                "message",
                format!("must be at least {MIN_MESSAGE_CHARS} characters"),
            ));
        } else if chars > MAX_FREE_TEXT_CHARS {
            issues.push(ValidationIssue::new(
                "message",
                format!("must be {MAX_FREE_TEXT_CHARS} characters or fewer"),
            ));
        }
    }

    let reason = match trimmed(&raw.reason) {
        Some(value) => match EnquiryReason::parse(&value) {
            Some(reason) => Some(reason),
            None => {
                issues.push(ValidationIssue::new(
                    "reason",
                    "must be one of out-of-area, general, custom-request",
                ));
                None
            }
        },
        None => {
            issues.push(ValidationIssue::new("reason", "is required"));
            None
        }
    };

    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(ValidatedEnquiry {
        service_type: trimmed(&raw.service_type),
        service_name: trimmed(&raw.service_name),
        postcode: postcode.unwrap_or_default(),
        address: trimmed(&raw.address),
        client_name: client_name.unwrap_or_default(),
        client_email: client_email.unwrap_or_default(),
        client_phone: client_phone.unwrap_or_default(),
        message: message.unwrap_or_default(),
        preferred_date: trimmed(&raw.preferred_date),
        preferred_time: trimmed(&raw.preferred_time),
        reason: reason.unwrap_or(EnquiryReason::General),
    })
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}

fn require_text(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    value: &Option<String>,
) -> Option<String> {
    let text = trimmed(value);
    if text.is_none() {
        issues.push(ValidationIssue::new(field, "is required"));
    }
    text
}

fn require_consent(issues: &mut Vec<ValidationIssue>, field: &str, value: &Option<bool>) {
    if !value.unwrap_or(false) {
        issues.push(ValidationIssue::new(field, "must be accepted"));
    }
}

fn check_non_negative(
    issues: &mut Vec<ValidationIssue>,
    field: impl Into<String>,
    value: &Option<Decimal>,
) {
    if let Some(amount) = value {
        if *amount < Decimal::ZERO {
            issues.push(ValidationIssue::new(field, "must not be negative"));
        }
    }
}

fn check_postcode_shape(issues: &mut Vec<ValidationIssue>, value: &str) {
    let normalized = normalize_postcode(value);
    let length = normalized.chars().count();
    if !(5..=8).contains(&length) || !normalized.chars().any(|ch| ch.is_ascii_digit()) {
        issues.push(ValidationIssue::new("postcode", "must be a full UK postcode"));
    }
}

fn plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn plausible_phone(value: &str) -> bool {
    let digits = value.chars().filter(|ch| ch.is_ascii_digit()).count();
    (10..=15).contains(&digits)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::booking::{RawAddOn, RawAdditionalClient, RawBookingRequest, RawTimeBasedSelection};
    use crate::domain::enquiry::{EnquiryReason, RawEnquiryRequest};
    use crate::quote::config::PricingConfig;

    use super::{honeypot_tripped, validate_booking, validate_enquiry};

    fn valid_booking() -> RawBookingRequest {
        RawBookingRequest {
            website: Some(String::new()),
            service_type: Some("haircut".to_string()),
            selected_option: Some("wash-cut-finish".to_string()),
            service_name: Some("Haircuts".to_string()),
            option_name: Some("Wash, Cut & Finish".to_string()),
            postcode: Some("CH1 4EY".to_string()),
            address: Some("12 Garden Lane, Chester".to_string()),
            selected_date: Some("2026-09-01".to_string()),
            selected_time: Some("10:00".to_string()),
            client_name: Some("Jane Doe".to_string()),
            client_email: Some("jane@example.com".to_string()),
            client_phone: Some("07700 900123".to_string()),
            consent_boundaries: Some(true),
            consent_cancellation: Some(true),
            consent_women_only: Some(true),
            ..RawBookingRequest::default()
        }
    }

    fn valid_enquiry() -> RawEnquiryRequest {
        RawEnquiryRequest {
            website: None,
            postcode: Some("LL65 1AA".to_string()),
            client_name: Some("Alex Roe".to_string()),
            client_email: Some("alex@example.com".to_string()),
            client_phone: Some("07700900456".to_string()),
            message: Some("Could you travel to Anglesey for a wedding party of five?".to_string()),
            reason: Some("out-of-area".to_string()),
            ..RawEnquiryRequest::default()
        }
    }

    #[test]
    fn honeypot_trips_only_on_real_content() {
        assert!(!honeypot_tripped(&None));
        assert!(!honeypot_tripped(&Some(String::new())));
        assert!(!honeypot_tripped(&Some("   ".to_string())));
        assert!(honeypot_tripped(&Some("https://spam.example".to_string())));
    }

    #[test]
    fn valid_booking_passes_and_trims_fields() {
        let mut raw = valid_booking();
        raw.client_name = Some("  Jane Doe  ".to_string());

        let booking = validate_booking(&raw, &PricingConfig::default()).expect("valid booking");
        assert_eq!(booking.client_name, "Jane Doe");
        assert_eq!(booking.selected_option, "wash-cut-finish");
        assert!(!booking.is_new_client);
    }

    #[test]
    fn missing_required_fields_report_each_field_once() {
        let raw = RawBookingRequest::default();
        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();

        for field in ["serviceType", "selectedOption", "postcode", "clientName", "clientEmail"] {
            assert_eq!(
                issues.iter().filter(|issue| issue.field == field).count(),
                1,
                "expected exactly one issue for {field}: {issues:?}"
            );
        }
    }

    #[test]
    fn all_three_consents_are_mandatory() {
        let mut raw = valid_booking();
        raw.consent_boundaries = Some(false);
        raw.consent_cancellation = None;
        raw.consent_women_only = Some(true);

        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "consentBoundaries"));
        assert!(issues.iter().any(|issue| issue.field == "consentCancellation"));
        assert!(issues.iter().all(|issue| issue.field != "consentWomenOnly"));
    }

    #[test]
    fn contact_details_have_shape_checks() {
        let mut raw = valid_booking();
        raw.client_email = Some("not-an-email".to_string());
        raw.client_phone = Some("12345".to_string());
        raw.postcode = Some("CH1".to_string());

        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "clientEmail"));
        assert!(issues.iter().any(|issue| issue.field == "clientPhone"));
        assert!(issues
            .iter()
            .any(|issue| issue.field == "postcode" && issue.message.contains("full UK postcode")));
    }

    #[test]
    fn nested_add_on_shapes_are_checked_with_indexed_fields() {
        let mut raw = valid_booking();
        raw.add_ons = vec![
            RawAddOn {
                id: Some("olaplex".to_string()),
                name: Some("Olaplex Bond Builder".to_string()),
                price: Some(Decimal::from(15)),
                duration: Some(Decimal::from(15)),
            },
            RawAddOn { id: None, price: Some(Decimal::from(-3)), ..RawAddOn::default() },
        ];

        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "addOns[1].id"));
        assert!(issues.iter().any(|issue| issue.field == "addOns[1].price"));
        assert!(issues.iter().all(|issue| !issue.field.starts_with("addOns[0]")));
    }

    #[test]
    fn additional_client_count_is_capped() {
        let mut raw = valid_booking();
        raw.additional_clients = (0..5)
            .map(|_| RawAdditionalClient {
                service_id: Some("gents-cut".to_string()),
                ..RawAdditionalClient::default()
            })
            .collect();

        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "additionalClients"));
    }

    #[test]
    fn time_based_selection_requires_positive_bounded_hours() {
        let mut raw = valid_booking();
        raw.time_based_selection =
            Some(RawTimeBasedSelection { hours: Some(Decimal::ZERO), price: None });
        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "timeBasedSelection.hours"));

        raw.time_based_selection =
            Some(RawTimeBasedSelection { hours: Some(Decimal::from(13)), price: None });
        let issues = validate_booking(&raw, &PricingConfig::default()).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "timeBasedSelection.hours"));
    }

    #[test]
    fn client_submitted_figures_survive_for_diffing_only() {
        let mut raw = valid_booking();
        raw.total = Some(Decimal::from(999_999));
        raw.deposit_required = Some(false);

        let booking = validate_booking(&raw, &PricingConfig::default()).expect("valid booking");
        assert_eq!(booking.client_figures.total, Some(Decimal::from(999_999)));
        assert_eq!(booking.client_figures.deposit_required, Some(false));
    }

    #[test]
    fn valid_enquiry_passes() {
        let enquiry = validate_enquiry(&valid_enquiry()).expect("valid enquiry");
        assert_eq!(enquiry.reason, EnquiryReason::OutOfArea);
        assert_eq!(enquiry.postcode, "LL65 1AA");
    }

    #[test]
    fn short_enquiry_message_is_rejected() {
        let mut raw = valid_enquiry();
        raw.message = Some("Too short".to_string());

        let issues = validate_enquiry(&raw).unwrap_err();
        assert!(issues
            .iter()
            .any(|issue| issue.field == "message" && issue.message.contains("at least 20")));
    }

    #[test]
    fn unknown_enquiry_reason_is_rejected() {
        let mut raw = valid_enquiry();
        raw.reason = Some("pricing".to_string());

        let issues = validate_enquiry(&raw).unwrap_err();
        assert!(issues.iter().any(|issue| issue.field == "reason"));
    }
}
