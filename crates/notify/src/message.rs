//! Email composition.
//!
//! Plain-text bodies only; every subject carries the booking or enquiry
//! reference.

use rust_decimal::Decimal;

use salonbook_core::{QuoteOutcome, ValidatedBooking, ValidatedEnquiry};

/// A composed, ready-to-send email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
}

pub fn format_gbp(amount: Decimal) -> String {
    format!("\u{a3}{amount:.2}")
}

/// The full job sheet sent to the stylist for every accepted booking.
pub fn business_booking_email(
    booking: &ValidatedBooking,
    outcome: &QuoteOutcome,
    reference: &str,
    business_address: &str,
) -> EmailMessage {
    let mut lines = vec![
        format!("Booking reference: {reference}"),
        String::new(),
        "Client".to_string(),
        format!("  Name: {}", booking.client_name),
        format!("  Phone: {}", booking.client_phone),
        format!("  Email: {}", booking.client_email),
        format!("  New client: {}", if booking.is_new_client { "yes" } else { "no" }),
        String::new(),
        "Visit".to_string(),
        format!("  Date: {} at {}", booking.selected_date, booking.selected_time),
        format!("  Address: {}, {}", booking.address, outcome.area.normalized_postcode),
        format!("  Travel band: {}", outcome.area.tier.label),
        format!("  Estimated duration: {} minutes", outcome.breakdown.estimated_duration_minutes),
        String::new(),
        "Pricing".to_string(),
    ];

    for item in &outcome.breakdown.items {
        lines.push(format!("  {}: {}", item.label, format_gbp(item.amount)));
    }
    lines.push(format!("  Total: {}", format_gbp(outcome.breakdown.total)));
    if outcome.deposit.required {
        lines.push(format!("  Deposit due: {}", format_gbp(outcome.deposit.amount)));
    }

    if let Some(requests) = &booking.special_requests {
        lines.push(String::new());
        lines.push("Special requests".to_string());
        lines.push(format!("  {requests}"));
    }

    EmailMessage {
        to: business_address.to_string(),
        subject: format!(
            "New booking {reference}: {} on {}",
            booking.option_name, booking.selected_date
        ),
        text_body: lines.join("\n"),
    }
}

/// Confirmation sent to the client once their booking is accepted.
pub fn customer_booking_confirmation(
    booking: &ValidatedBooking,
    outcome: &QuoteOutcome,
    reference: &str,
) -> EmailMessage {
    let mut lines = vec![
        format!("Hi {},", booking.client_name),
        String::new(),
        format!(
            "Your booking for {} on {} at {} is confirmed.",
            booking.option_name, booking.selected_date, booking.selected_time
        ),
        format!("Your reference is {reference}. Please quote it in any messages about this visit."),
        String::new(),
        format!("Total: {}", format_gbp(outcome.breakdown.total)),
    ];

    if outcome.deposit.required {
        lines.push(format!(
            "A deposit of {} secures your appointment. Payment details follow separately.",
            format_gbp(outcome.deposit.amount)
        ));
    }

    lines.push(String::new());
    lines.push("Thank you for booking with us.".to_string());

    EmailMessage {
        to: booking.client_email.clone(),
        subject: format!("Your booking {reference} is confirmed"),
        text_body: lines.join("\n"),
    }
}

/// Enquiry details sent to the stylist.
pub fn business_enquiry_email(
    enquiry: &ValidatedEnquiry,
    reference: &str,
    business_address: &str,
) -> EmailMessage {
    let mut lines = vec![
        format!("Enquiry reference: {reference}"),
        format!("Reason: {}", enquiry.reason.as_str()),
        String::new(),
        "Contact".to_string(),
        format!("  Name: {}", enquiry.client_name),
        format!("  Phone: {}", enquiry.client_phone),
        format!("  Email: {}", enquiry.client_email),
        format!("  Postcode: {}", enquiry.postcode),
    ];

    if let Some(service_name) = &enquiry.service_name {
        lines.push(format!("  Service of interest: {service_name}"));
    }
    if let (Some(date), Some(time)) = (&enquiry.preferred_date, &enquiry.preferred_time) {
        lines.push(format!("  Preferred slot: {date} at {time}"));
    }

    lines.push(String::new());
    lines.push("Message".to_string());
    lines.push(format!("  {}", enquiry.message));

    EmailMessage {
        to: business_address.to_string(),
        subject: format!("New enquiry {reference} ({})", enquiry.reason.as_str()),
        text_body: lines.join("\n"),
    }
}

/// Acknowledgement sent to the enquirer.
pub fn customer_enquiry_acknowledgement(
    enquiry: &ValidatedEnquiry,
    reference: &str,
) -> EmailMessage {
    let lines = vec![
        format!("Hi {},", enquiry.client_name),
        String::new(),
        "Thanks for getting in touch. We have your enquiry and will reply within two working days."
            .to_string(),
        format!("Your reference is {reference}."),
    ];

    EmailMessage {
        to: enquiry.client_email.clone(),
        subject: format!("We received your enquiry {reference}"),
        text_body: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use salonbook_core::quote::area::{AreaResolution, ResolvedTier};
    use salonbook_core::quote::deposit::DepositDecision;
    use salonbook_core::quote::pricing::{BreakdownItemKind, PriceBreakdown, PriceBreakdownItem};
    use salonbook_core::{
        ClientSubmittedFigures, EnquiryReason, QuoteOutcome, ValidatedBooking, ValidatedEnquiry,
    };

    use super::{business_booking_email, customer_enquiry_acknowledgement, format_gbp};

    fn booking() -> ValidatedBooking {
        ValidatedBooking {
            service_type: "haircut".to_string(),
            selected_option: "wash-cut-finish".to_string(),
            service_name: "Haircuts".to_string(),
            option_name: "Wash, Cut & Finish".to_string(),
            add_on_ids: Vec::new(),
            hair_length_surcharge: false,
            additional_client_service_ids: Vec::new(),
            time_based_hours: None,
            postcode: "CH1 4EY".to_string(),
            address: "12 Garden Lane, Chester".to_string(),
            selected_date: "2026-09-01".to_string(),
            selected_time: "10:00".to_string(),
            is_same_day: false,
            client_name: "Jane Doe".to_string(),
            client_email: "jane@example.com".to_string(),
            client_phone: "07700900123".to_string(),
            special_requests: Some("Parking is on the street".to_string()),
            is_new_client: true,
            client_figures: ClientSubmittedFigures::default(),
        }
    }

    fn outcome() -> QuoteOutcome {
        QuoteOutcome {
            area: AreaResolution {
                normalized_postcode: "CH1 4EY".to_string(),
                district: "CH1".to_string(),
                distance_miles: Some(0.8),
                tier: ResolvedTier {
                    label: "Local (up to 5 miles)".to_string(),
                    fee: Decimal::ZERO,
                    enquiry_only: false,
                },
            },
            breakdown: PriceBreakdown {
                items: vec![PriceBreakdownItem {
                    label: "Wash, Cut & Finish".to_string(),
                    amount: Decimal::from(35),
                    kind: BreakdownItemKind::Service,
                }],
                subtotal: Decimal::from(35),
                total: Decimal::from(35),
                minimum_charge_applied: false,
                estimated_duration_minutes: 45,
            },
            deposit: DepositDecision { required: true, amount: Decimal::from(7) },
            is_colour_service: false,
        }
    }

    #[test]
    fn gbp_amounts_use_two_decimal_places() {
        assert_eq!(format_gbp(Decimal::from(45)), "\u{a3}45.00");
        assert_eq!(format_gbp(Decimal::new(1250, 2)), "\u{a3}12.50");
    }

    #[test]
    fn business_email_carries_the_whole_job_sheet() {
        let email =
            business_booking_email(&booking(), &outcome(), "CHS-20260901-K3QX", "me@salon.example");

        assert_eq!(email.to, "me@salon.example");
        assert!(email.subject.contains("CHS-20260901-K3QX"));
        assert!(email.text_body.contains("Jane Doe"));
        assert!(email.text_body.contains("CH1 4EY"));
        assert!(email.text_body.contains("Total: \u{a3}35.00"));
        assert!(email.text_body.contains("Deposit due: \u{a3}7.00"));
        assert!(email.text_body.contains("Parking is on the street"));
        assert!(email.text_body.contains("New client: yes"));
    }

    #[test]
    fn enquiry_acknowledgement_goes_to_the_enquirer() {
        let enquiry = ValidatedEnquiry {
            service_type: None,
            service_name: None,
            postcode: "LL65 1AA".to_string(),
            address: None,
            client_name: "Alex Roe".to_string(),
            client_email: "alex@example.com".to_string(),
            client_phone: "07700900456".to_string(),
            message: "Could you travel to Anglesey for a wedding party of five?".to_string(),
            preferred_date: None,
            preferred_time: None,
            reason: EnquiryReason::OutOfArea,
        };

        let email = customer_enquiry_acknowledgement(&enquiry, "ENQ-20260901-P2QR");

        assert_eq!(email.to, "alex@example.com");
        assert!(email.subject.contains("ENQ-20260901-P2QR"));
        assert!(email.text_body.contains("ENQ-20260901-P2QR"));
    }
}
