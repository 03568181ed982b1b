//! Quote construction for validated bookings.
//!
//! The pipeline re-resolves every id against the catalogue, gates on the
//! service area, prices the visit, enforces duration minimums, and decides
//! the deposit. Client-submitted money never feeds any step; it is kept to
//! one side for the cross-check in [`anomaly`].

pub mod anomaly;
pub mod area;
pub mod config;
pub mod deposit;
pub mod pricing;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::catalogue::{ServiceCatalogue, ServiceOption};
use crate::domain::booking::ValidatedBooking;
use crate::errors::{QuoteError, ValidationIssue};

use self::area::AreaResolution;
use self::config::PricingConfig;
use self::deposit::DepositDecision;
use self::pricing::{PriceBreakdown, PricedExtra, QuotePriceInput};

/// Billing granularity for hourly services that do not declare their own.
const DEFAULT_BILLING_INCREMENT_MINUTES: u32 = 15;

/// Everything the server computed for one booking.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuoteOutcome {
    pub area: AreaResolution,
    pub breakdown: PriceBreakdown,
    pub deposit: DepositDecision,
    /// Derived from the resolved option's category, never from the client.
    pub is_colour_service: bool,
}

/// Build the authoritative quote for a validated booking.
///
/// `now` anchors same-day detection so callers and tests share one clock.
///
/// Fails with [`QuoteError::Validation`] for unknown ids, a missing hourly
/// selection, or a visit shorter than the area's minimum; with
/// [`QuoteError::OutOfServiceArea`] when the postcode lands in an
/// enquiry-only tier; and with [`QuoteError::Internal`] when the catalogue
/// itself is broken.
pub fn build_booking_quote(
    booking: &ValidatedBooking,
    catalogue: &ServiceCatalogue,
    config: &PricingConfig,
    now: DateTime<Utc>,
) -> Result<QuoteOutcome, QuoteError> {
    let Some(option) = catalogue.find_option(&booking.selected_option) else {
        return Err(QuoteError::validation(vec![ValidationIssue::new(
            "selectedOption",
            format!("unknown service option \"{}\"", booking.selected_option),
        )]));
    };

    let mut issues = Vec::new();

    let mut add_ons = Vec::with_capacity(booking.add_on_ids.len());
    for (index, id) in booking.add_on_ids.iter().enumerate() {
        match catalogue.find_add_on(id) {
            Some(add_on) => add_ons.push(PricedExtra {
                label: add_on.name.clone(),
                price: add_on.price,
                duration_minutes: add_on.duration_minutes,
            }),
            None => issues.push(ValidationIssue::new(
                format!("addOns[{index}].id"),
                format!("unknown add-on \"{id}\""),
            )),
        }
    }

    let mut additional_clients = Vec::with_capacity(booking.additional_client_service_ids.len());
    for (index, id) in booking.additional_client_service_ids.iter().enumerate() {
        match catalogue.find_option(id) {
            Some(service) => additional_clients.push(PricedExtra {
                label: service.name.clone(),
                price: service.price,
                duration_minutes: service.duration_minutes,
            }),
            None => issues.push(ValidationIssue::new(
                format!("additionalClients[{index}].serviceId"),
                format!("unknown service option \"{id}\""),
            )),
        }
    }

    let (service_price, service_duration) =
        service_price_and_duration(option, booking.time_based_hours, &mut issues)?;

    if !issues.is_empty() {
        return Err(QuoteError::validation(issues));
    }

    let area = area::resolve(&booking.postcode, config);
    if area.tier.enquiry_only {
        return Err(QuoteError::OutOfServiceArea {
            postcode: area.normalized_postcode,
            district: area.district,
        });
    }

    let same_day =
        booking.is_same_day || falls_on(&booking.selected_date, now.date_naive());

    let breakdown = pricing::compute_breakdown(
        &QuotePriceInput {
            service_label: option.name.clone(),
            service_price,
            service_duration_minutes: service_duration,
            service_category: option.category,
            hair_length_eligible: option.hair_length_surcharge_eligible,
            package_discount: option.package_discount,
            add_ons,
            additional_clients,
            hair_length_surcharge_requested: booking.hair_length_surcharge,
            same_day,
            travel_fee: area.tier.fee,
            travel_label: Some(area.tier.label.clone()),
        },
        config,
    );

    let minimums = &config.booking_minimums;
    let distant = matches!(area.distance_miles, Some(miles) if miles >= minimums.distant_from_miles);
    let required_minutes =
        if distant { minimums.distant_minutes } else { minimums.standard_minutes };
    if breakdown.estimated_duration_minutes < required_minutes {
        return Err(QuoteError::validation(vec![ValidationIssue::new(
            "duration",
            format!(
                "booked services must total at least {required_minutes} minutes for your area \
                 (currently {})",
                breakdown.estimated_duration_minutes
            ),
        )]));
    }

    let is_colour_service = option.category.is_colour();
    let deposit = deposit::decide(
        breakdown.total,
        booking.is_new_client,
        is_colour_service,
        &config.deposit,
    );

    Ok(QuoteOutcome { area, breakdown, deposit, is_colour_service })
}

/// Resolve the headline service's price and billed duration.
///
/// Fixed services read straight off the catalogue. Hourly services bill the
/// requested hours snapped up to the option's increment and floored at its
/// minimum call-out, priced at the hourly rate.
fn service_price_and_duration(
    option: &ServiceOption,
    hours: Option<Decimal>,
    issues: &mut Vec<ValidationIssue>,
) -> Result<(Decimal, u32), QuoteError> {
    if !option.time_based {
        return Ok((option.price, option.duration_minutes));
    }

    let Some(rate) = option.hourly_rate else {
        return Err(QuoteError::Internal(format!(
            "time-based option \"{}\" has no hourly rate configured",
            option.id
        )));
    };
    let Some(hours) = hours else {
        issues.push(ValidationIssue::new(
            "timeBasedSelection",
            format!("is required for \"{}\"", option.name),
        ));
        return Ok((Decimal::ZERO, 0));
    };

    let billed = billed_minutes(hours, option);
    let price = (rate * Decimal::from(billed) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok((price, billed))
}

fn billed_minutes(hours: Decimal, option: &ServiceOption) -> u32 {
    let requested = (hours * Decimal::from(60)).ceil().to_u32().unwrap_or(0);
    let increment = option.increment_minutes.unwrap_or(DEFAULT_BILLING_INCREMENT_MINUTES).max(1);
    let snapped = requested.div_ceil(increment).max(1) * increment;
    snapped.max(option.min_duration_minutes.unwrap_or(0))
}

fn falls_on(date: &str, today: NaiveDate) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map(|parsed| parsed == today).unwrap_or(false)
}
